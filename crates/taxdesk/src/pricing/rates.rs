use super::domain::{ClientType, Complexity, Location, LoyaltyLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Lookup tables composed by the quote calculator. Serializes to the six-key
/// document served by `GET /pricing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTables {
    pub base_pricing: BTreeMap<String, f64>,
    pub complexity_multipliers: BTreeMap<Complexity, f64>,
    pub rush_fees: BTreeMap<String, f64>,
    pub client_discounts: BTreeMap<ClientType, f64>,
    pub loyalty_discounts: BTreeMap<LoyaltyLevel, f64>,
    pub location_multipliers: BTreeMap<Location, f64>,
}

impl RateTables {
    pub fn standard() -> Self {
        let base_pricing = [
            ("individual-basic", 199.0),
            ("individual-premium", 399.0),
            ("individual-complex", 599.0),
            ("business-basic", 799.0),
            ("business-premium", 1299.0),
            ("bookkeeping-monthly", 299.0),
            ("payroll-monthly", 149.0),
            ("tax-planning", 499.0),
            ("amended-return", 249.0),
        ];
        let rush_fees = [
            ("individual-basic", 50.0),
            ("individual-premium", 75.0),
            ("individual-complex", 100.0),
            ("business-basic", 150.0),
            ("business-premium", 200.0),
            ("tax-planning", 100.0),
            ("amended-return", 75.0),
        ];

        Self {
            base_pricing: base_pricing
                .into_iter()
                .map(|(key, price)| (key.to_string(), price))
                .collect(),
            complexity_multipliers: BTreeMap::from([
                (Complexity::Simple, 1.0),
                (Complexity::Moderate, 1.3),
                (Complexity::Complex, 1.7),
                (Complexity::VeryComplex, 2.2),
            ]),
            rush_fees: rush_fees
                .into_iter()
                .map(|(key, fee)| (key.to_string(), fee))
                .collect(),
            client_discounts: BTreeMap::from([
                (ClientType::New, 0.0),
                (ClientType::Returning, 0.05),
                (ClientType::Vip, 0.10),
                (ClientType::Enterprise, 0.15),
            ]),
            loyalty_discounts: BTreeMap::from([
                (LoyaltyLevel::Bronze, 0.02),
                (LoyaltyLevel::Silver, 0.05),
                (LoyaltyLevel::Gold, 0.08),
                (LoyaltyLevel::Platinum, 0.12),
            ]),
            location_multipliers: BTreeMap::from([
                (Location::Urban, 1.1),
                (Location::Suburban, 1.0),
                (Location::Rural, 0.9),
            ]),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RateTableError> {
        let tables: RateTables = serde_json::from_reader(reader)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_path(path: &Path) -> Result<Self, RateTableError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Rejects entries that could drive a quote total below zero.
    pub fn validate(&self) -> Result<(), RateTableError> {
        for (key, value) in &self.base_pricing {
            check_amount("basePricing", key, *value)?;
        }
        for (key, value) in &self.rush_fees {
            check_amount("rushFees", key, *value)?;
        }
        for (tier, value) in &self.complexity_multipliers {
            check_amount("complexityMultipliers", tier.as_str(), *value)?;
        }
        for (tier, value) in &self.location_multipliers {
            check_amount("locationMultipliers", tier.as_str(), *value)?;
        }

        let max_client = self.client_discounts.values().copied().fold(0.0, f64::max);
        let max_loyalty = self.loyalty_discounts.values().copied().fold(0.0, f64::max);
        for (tier, value) in &self.client_discounts {
            check_rate("clientDiscounts", tier.as_str(), *value)?;
        }
        for (tier, value) in &self.loyalty_discounts {
            check_rate("loyaltyDiscounts", tier.as_str(), *value)?;
        }
        if max_client + max_loyalty > 1.0 {
            return Err(RateTableError::DiscountOverflow {
                combined: max_client + max_loyalty,
            });
        }

        Ok(())
    }

    pub fn base_price(&self, service_type: &str) -> Option<f64> {
        self.base_pricing.get(service_type).copied()
    }

    pub fn rush_fee(&self, service_type: &str) -> Option<f64> {
        self.rush_fees.get(service_type).copied()
    }

    pub fn complexity_multiplier(&self, complexity: Complexity) -> Option<f64> {
        self.complexity_multipliers.get(&complexity).copied()
    }

    pub fn client_discount(&self, client_type: ClientType) -> Option<f64> {
        self.client_discounts.get(&client_type).copied()
    }

    pub fn loyalty_discount(&self, level: LoyaltyLevel) -> Option<f64> {
        self.loyalty_discounts.get(&level).copied()
    }

    pub fn location_multiplier(&self, location: Location) -> Option<f64> {
        self.location_multipliers.get(&location).copied()
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// Percentages and fallbacks applied outside the lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurchargeRates {
    pub sales_tax_rate: f64,
    pub processing_fee_rate: f64,
    pub fallback_base_price: f64,
    pub fallback_rush_fee: f64,
}

impl SurchargeRates {
    pub const STANDARD: SurchargeRates = SurchargeRates {
        sales_tax_rate: 0.0825,
        processing_fee_rate: 0.029,
        fallback_base_price: 199.0,
        fallback_rush_fee: 50.0,
    };
}

impl Default for SurchargeRates {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    #[error("unable to read rate tables: {0}")]
    Io(#[from] std::io::Error),
    #[error("rate tables are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{table}.{key} must be a finite, non-negative number (got {value})")]
    InvalidEntry {
        table: &'static str,
        key: String,
        value: f64,
    },
    #[error("{table}.{key} must be a rate between 0 and 1 (got {value})")]
    InvalidRate {
        table: &'static str,
        key: String,
        value: f64,
    },
    #[error("largest client and loyalty discounts combine to {combined:.2}, above 1.0")]
    DiscountOverflow { combined: f64 },
}

fn check_amount(table: &'static str, key: &str, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RateTableError::InvalidEntry {
            table,
            key: key.to_string(),
            value,
        })
    }
}

fn check_rate(table: &'static str, key: &str, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RateTableError::InvalidRate {
            table,
            key: key.to_string(),
            value,
        })
    }
}
