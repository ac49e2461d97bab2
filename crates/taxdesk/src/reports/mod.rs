//! Threshold rules turning report summary metrics into insights and recommendations.

pub mod domain;
mod engine;
mod rules;
pub mod router;
mod thresholds;

pub use domain::{
    metric, Effort, Insight, InsightCategory, Priority, ReportDescriptor, ReportError,
    ReportInsights, ReportKind, ReportMetrics, ReportRecommendation,
};
pub use engine::{health_score, InsightEngine};
pub use router::{reports_router, InsightRequest};
pub use thresholds::{ReportThresholds, ThresholdsError};
