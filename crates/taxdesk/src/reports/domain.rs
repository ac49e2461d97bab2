use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reports that carry insight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    TaxSummary,
    RevenueTrend,
    ClientRetention,
    CampaignPerformance,
    Compliance,
}

impl ReportKind {
    pub const fn ordered() -> [ReportKind; 5] {
        [
            Self::TaxSummary,
            Self::RevenueTrend,
            Self::ClientRetention,
            Self::CampaignPerformance,
            Self::Compliance,
        ]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::TaxSummary => "tax-summary",
            Self::RevenueTrend => "revenue-trend",
            Self::ClientRetention => "client-retention",
            Self::CampaignPerformance => "campaign-performance",
            Self::Compliance => "compliance",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TaxSummary => "Tax Summary",
            Self::RevenueTrend => "Revenue Trend",
            Self::ClientRetention => "Client Retention",
            Self::CampaignPerformance => "Campaign Performance",
            Self::Compliance => "Compliance Review",
        }
    }

    /// Metric names the rules for this report read.
    pub const fn metrics(self) -> &'static [&'static str] {
        match self {
            Self::TaxSummary => &[
                metric::EFFECTIVE_TAX_RATE,
                metric::TOTAL_INCOME,
                metric::DEDUCTIONS,
                metric::REFUND_AMOUNT,
            ],
            Self::RevenueTrend => &[metric::REVENUE_CHANGE_PCT],
            Self::ClientRetention => &[metric::RETENTION_RATE, metric::NET_PROMOTER_SCORE],
            Self::CampaignPerformance => &[metric::CONVERSION_RATE, metric::RETURN_ON_SPEND_PCT],
            Self::Compliance => &[metric::COMPLIANCE_SCORE, metric::OPEN_FINDINGS],
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(raw.trim()))
    }
}

pub mod metric {
    pub const EFFECTIVE_TAX_RATE: &str = "effectiveTaxRate";
    pub const TOTAL_INCOME: &str = "totalIncome";
    pub const DEDUCTIONS: &str = "deductions";
    pub const REFUND_AMOUNT: &str = "refundAmount";
    pub const REVENUE_CHANGE_PCT: &str = "revenueChangePct";
    pub const RETENTION_RATE: &str = "retentionRate";
    pub const NET_PROMOTER_SCORE: &str = "netPromoterScore";
    pub const CONVERSION_RATE: &str = "conversionRate";
    pub const RETURN_ON_SPEND_PCT: &str = "returnOnSpendPct";
    pub const COMPLIANCE_SCORE: &str = "complianceScore";
    pub const OPEN_FINDINGS: &str = "openFindings";
}

/// Summary figures supplied by the caller, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportMetrics(BTreeMap<String, f64>);

impl ReportMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for ReportMetrics {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Opportunity,
    Risk,
    Trend,
    Efficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub category: InsightCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    /// 1 (minor) through 10 (major).
    pub impact: u8,
    /// 0 through 100.
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecommendation {
    pub id: String,
    pub category: InsightCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub effort: Effort,
    pub timeline: String,
    pub action_items: Vec<String>,
}

/// Insight rule output for a single report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInsights {
    pub report_id: &'static str,
    pub report_label: &'static str,
    pub generated_at: DateTime<Utc>,
    pub health_score: u8,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<ReportRecommendation>,
}

/// Catalog entry describing a supported report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub metrics: &'static [&'static str],
}

impl From<ReportKind> for ReportDescriptor {
    fn from(kind: ReportKind) -> Self {
        Self {
            id: kind.id(),
            label: kind.label(),
            metrics: kind.metrics(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("unknown report '{0}'")]
    UnknownReport(String),
    #[error("metric '{name}' must be a finite number (got {value})")]
    InvalidMetric { name: String, value: f64 },
}
