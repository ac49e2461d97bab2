use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{
    Insight, InsightCategory, Priority, ReportDescriptor, ReportError, ReportInsights,
    ReportKind, ReportMetrics,
};
use super::rules::apply_rules;
use super::thresholds::ReportThresholds;
use crate::config::{ConfigError, ReportsConfig};

/// Stateless evaluator that applies the threshold rules to supplied report metrics.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    thresholds: ReportThresholds,
}

impl InsightEngine {
    pub fn new(thresholds: ReportThresholds) -> Self {
        Self { thresholds }
    }

    /// Builds the engine with any configured threshold overrides.
    pub fn from_config(config: &ReportsConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.thresholds()?))
    }

    pub fn thresholds(&self) -> &ReportThresholds {
        &self.thresholds
    }

    pub fn catalog(&self) -> Vec<ReportDescriptor> {
        ReportKind::ordered()
            .into_iter()
            .map(ReportDescriptor::from)
            .collect()
    }

    pub fn generate(
        &self,
        report_id: &str,
        metrics: &ReportMetrics,
    ) -> Result<ReportInsights, ReportError> {
        self.generate_at(report_id, metrics, Utc::now())
    }

    pub fn generate_at(
        &self,
        report_id: &str,
        metrics: &ReportMetrics,
        now: DateTime<Utc>,
    ) -> Result<ReportInsights, ReportError> {
        let kind = ReportKind::parse(report_id)
            .ok_or_else(|| ReportError::UnknownReport(report_id.to_string()))?;

        if let Some((name, value)) = metrics.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ReportError::InvalidMetric {
                name: name.to_string(),
                value,
            });
        }

        let output = apply_rules(kind, metrics, &self.thresholds);
        let health_score = health_score(&output.insights);

        debug!(
            report = kind.id(),
            insights = output.insights.len(),
            recommendations = output.recommendations.len(),
            health_score,
            "report insights generated"
        );

        Ok(ReportInsights {
            report_id: kind.id(),
            report_label: kind.label(),
            generated_at: now,
            health_score,
            insights: output.insights,
            recommendations: output.recommendations,
        })
    }
}

/// 100 minus a penalty for every risk insight, weighted by priority.
pub fn health_score(insights: &[Insight]) -> u8 {
    let penalty: u32 = insights
        .iter()
        .filter(|insight| insight.category == InsightCategory::Risk)
        .map(|insight| match insight.priority {
            Priority::Critical => 25,
            Priority::High => 15,
            Priority::Medium => 8,
            Priority::Low => 3,
        })
        .sum();

    100u32.saturating_sub(penalty) as u8
}
