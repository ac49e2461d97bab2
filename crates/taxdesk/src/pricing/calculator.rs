use super::domain::QuoteRequest;
use super::rates::{RateTables, SurchargeRates};
use serde::{Deserialize, Serialize};

/// Itemised quote. Only `total` is rounded; every other figure keeps full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub base_price: f64,
    pub complexity_adjustment: f64,
    pub rush_fee: f64,
    pub location_adjustment: f64,
    pub seasonal_adjustment: f64,
    pub subtotal: f64,
    pub client_discount: f64,
    pub loyalty_discount: f64,
    pub discount_rate: f64,
    pub total_discount: f64,
    pub tax_amount: f64,
    pub processing_fee: f64,
    pub total: f64,
}

impl QuoteBreakdown {
    /// Amount the tax and processing fee are charged on.
    pub fn discounted_subtotal(&self) -> f64 {
        self.subtotal - self.total_discount
    }
}

/// Multipliers and rates resolved for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_multiplier: Option<f64>,
    pub location_multiplier: f64,
    pub seasonal_factor: f64,
    pub client_discount_rate: f64,
    pub loyalty_discount_rate: f64,
    pub discount_rate: f64,
}

pub fn resolve_rates(tables: &RateTables, request: &QuoteRequest) -> AppliedRates {
    let complexity_multiplier = request
        .complexity
        .and_then(|tier| tables.complexity_multiplier(tier));
    let location_multiplier = request
        .location
        .and_then(|location| tables.location_multiplier(location))
        .unwrap_or(1.0);
    let client_rate = request
        .client_type
        .and_then(|tier| tables.client_discount(tier))
        .unwrap_or(0.0);
    let loyalty_rate = request
        .loyalty_level
        .and_then(|level| tables.loyalty_discount(level))
        .unwrap_or(0.0);

    AppliedRates {
        complexity_multiplier,
        location_multiplier,
        seasonal_factor: request.effective_seasonal_factor(),
        client_discount_rate: client_rate,
        loyalty_discount_rate: loyalty_rate,
        discount_rate: client_rate + loyalty_rate,
    }
}

pub fn compute_quote(
    tables: &RateTables,
    surcharges: &SurchargeRates,
    request: &QuoteRequest,
) -> QuoteBreakdown {
    let applied = resolve_rates(tables, request);

    let listed_price = request
        .service_type()
        .and_then(|service| tables.base_price(service))
        .unwrap_or(surcharges.fallback_base_price);

    // Complexity only applies when the tier is present in the table; location and
    // seasonal factors always apply with a neutral default.
    let adjusted_base = match applied.complexity_multiplier {
        Some(multiplier) => listed_price * multiplier,
        None => listed_price,
    };

    let rush_fee = if request.is_rush {
        request
            .service_type()
            .and_then(|service| tables.rush_fee(service))
            .unwrap_or(surcharges.fallback_rush_fee)
    } else {
        0.0
    };

    let located = adjusted_base * applied.location_multiplier;
    let seasonal = located * applied.seasonal_factor;
    let subtotal = seasonal + rush_fee;

    let total_discount = subtotal * applied.discount_rate;
    let tax_amount = (subtotal - total_discount) * surcharges.sales_tax_rate;
    let processing_fee = (subtotal - total_discount + tax_amount) * surcharges.processing_fee_rate;
    let total = round2(subtotal - total_discount + tax_amount + processing_fee);

    QuoteBreakdown {
        base_price: listed_price,
        complexity_adjustment: adjusted_base - listed_price,
        rush_fee,
        location_adjustment: located - adjusted_base,
        seasonal_adjustment: seasonal - located,
        subtotal,
        client_discount: subtotal * applied.client_discount_rate,
        loyalty_discount: subtotal * applied.loyalty_discount_rate,
        discount_rate: applied.discount_rate,
        total_discount,
        tax_amount,
        processing_fee,
        total,
    }
}

/// Rounds to cents, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_half_cents_up() {
        assert_eq!(round2(221.6646), 221.66);
        assert_eq!(round2(10.005_000_1), 10.01);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn resolve_rates_defaults_to_neutral() {
        let applied = resolve_rates(&RateTables::standard(), &QuoteRequest::default());
        assert_eq!(applied.complexity_multiplier, None);
        assert_eq!(applied.location_multiplier, 1.0);
        assert_eq!(applied.seasonal_factor, 1.0);
        assert_eq!(applied.discount_rate, 0.0);
    }
}
