use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Cut-off values for the report insight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportThresholds {
    pub high_effective_tax_rate_pct: f64,
    pub min_deduction_ratio: f64,
    pub large_refund_amount: f64,
    pub revenue_decline_pct: f64,
    pub revenue_growth_pct: f64,
    pub min_retention_rate_pct: f64,
    pub promoter_score: f64,
    pub min_conversion_rate_pct: f64,
    pub strong_return_on_spend_pct: f64,
    pub min_compliance_score: f64,
    pub critical_compliance_score: f64,
    pub escalated_open_findings: f64,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            high_effective_tax_rate_pct: 25.0,
            min_deduction_ratio: 0.10,
            large_refund_amount: 3000.0,
            revenue_decline_pct: -10.0,
            revenue_growth_pct: 15.0,
            min_retention_rate_pct: 80.0,
            promoter_score: 50.0,
            min_conversion_rate_pct: 2.0,
            strong_return_on_spend_pct: 300.0,
            min_compliance_score: 90.0,
            critical_compliance_score: 75.0,
            escalated_open_findings: 5.0,
        }
    }
}

impl ReportThresholds {
    /// Reads a JSON document; keys it leaves out keep their defaults.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ThresholdsError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ThresholdsError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThresholdsError {
    #[error("unable to read report thresholds: {0}")]
    Io(#[from] std::io::Error),
    #[error("report thresholds are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
