use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::calculator::{compute_quote, resolve_rates, AppliedRates, QuoteBreakdown};
use super::domain::QuoteRequest;
use super::journal::{JournalError, QuoteJournal, QuoteRecord};
use super::rates::{RateTables, SurchargeRates};
use super::recommendations::{generate_recommendations, QuoteRecommendation};
use crate::config::{PricingConfig, DEFAULT_QUOTE_VALIDITY_DAYS};

pub const QUOTE_CURRENCY: &str = "USD";
pub const STANDARD_RATE_VERSION: &str = "standard";

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("quote for {service_type} overflowed to a non-finite total")]
    NonFiniteTotal { service_type: String },
}

/// Quote details that are not part of the price itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMetadata {
    pub calculated_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub currency: &'static str,
    pub rate_version: String,
    pub applied_rates: AppliedRates,
}

/// Successful `POST /pricing` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingQuote {
    pub success: bool,
    pub pricing: QuoteBreakdown,
    pub recommendations: Vec<QuoteRecommendation>,
    pub metadata: QuoteMetadata,
}

/// Facade combining the rate tables with the calculator, upsell rules and journal.
pub struct PricingService<J> {
    tables: RateTables,
    surcharges: SurchargeRates,
    validity: Duration,
    rate_version: String,
    journal: Arc<J>,
}

impl<J> PricingService<J>
where
    J: QuoteJournal,
{
    pub fn new(tables: RateTables, journal: Arc<J>) -> Self {
        Self {
            tables,
            surcharges: SurchargeRates::STANDARD,
            validity: Duration::days(i64::from(DEFAULT_QUOTE_VALIDITY_DAYS)),
            rate_version: STANDARD_RATE_VERSION.to_string(),
            journal,
        }
    }

    /// Builds the service from configuration, loading any configured rate-table file.
    pub fn from_config(
        config: &PricingConfig,
        journal: Arc<J>,
    ) -> Result<Self, crate::config::ConfigError> {
        let tables = config.rate_tables()?;
        let rate_version = config
            .rate_tables_path
            .as_ref()
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| STANDARD_RATE_VERSION.to_string());

        Ok(Self::new(tables, journal)
            .with_validity_days(config.quote_validity_days)
            .with_rate_version(rate_version))
    }

    pub fn with_surcharges(mut self, surcharges: SurchargeRates) -> Self {
        self.surcharges = surcharges;
        self
    }

    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity = Duration::days(i64::from(days));
        self
    }

    pub fn with_rate_version(mut self, version: impl Into<String>) -> Self {
        self.rate_version = version.into();
        self
    }

    pub fn rate_tables(&self) -> &RateTables {
        &self.tables
    }

    pub fn surcharges(&self) -> &SurchargeRates {
        &self.surcharges
    }

    pub fn breakdown(&self, request: &QuoteRequest) -> QuoteBreakdown {
        compute_quote(&self.tables, &self.surcharges, request)
    }

    pub fn quote(&self, request: QuoteRequest) -> Result<PricingQuote, QuoteError> {
        self.quote_at(request, Utc::now())
    }

    /// Prices the request and journals it. Inputs large enough to overflow the
    /// arithmetic are refused rather than answered with a non-finite total.
    pub fn quote_at(
        &self,
        request: QuoteRequest,
        now: DateTime<Utc>,
    ) -> Result<PricingQuote, QuoteError> {
        let pricing = self.breakdown(&request);
        if !pricing.total.is_finite() {
            return Err(QuoteError::NonFiniteTotal {
                service_type: request.service_type().unwrap_or("unspecified").to_string(),
            });
        }
        let recommendations = generate_recommendations(&request, &pricing);
        let applied_rates = resolve_rates(&self.tables, &request);

        debug!(
            service_type = request.service_type().unwrap_or("unspecified"),
            rush = request.is_rush,
            total = pricing.total,
            recommendations = recommendations.len(),
            "quote calculated"
        );

        let record = QuoteRecord {
            issued_at: now,
            request,
            breakdown: pricing,
        };
        if let Err(err) = self.journal.record(record) {
            warn!(error = %err, "quote issued without journal entry");
        }

        Ok(PricingQuote {
            success: true,
            pricing,
            recommendations,
            metadata: QuoteMetadata {
                calculated_at: now,
                valid_until: now + self.validity,
                currency: QUOTE_CURRENCY,
                rate_version: self.rate_version.clone(),
                applied_rates,
            },
        })
    }

    pub fn recent_quotes(&self, limit: usize) -> Result<Vec<QuoteRecord>, JournalError> {
        self.journal.recent(limit)
    }
}
