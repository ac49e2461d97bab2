//! Quote pricing: rate tables, the fixed-order calculator, upsell rules and the HTTP surface.

pub mod calculator;
pub mod domain;
pub mod journal;
pub mod rates;
pub mod recommendations;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use calculator::{compute_quote, resolve_rates, round2, AppliedRates, QuoteBreakdown};
pub use domain::{ClientType, Complexity, Location, LoyaltyLevel, QuoteRequest};
pub use journal::{JournalError, QuoteJournal, QuoteRecord};
pub use rates::{RateTableError, RateTables, SurchargeRates};
pub use recommendations::{
    generate_recommendations, QuoteRecommendation, RecommendationKind, SavingsEstimate,
};
pub use router::{pricing_router, PRICING_FAILURE_MESSAGE};
pub use service::{PricingQuote, PricingService, QuoteError, QuoteMetadata};
