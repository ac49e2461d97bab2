use crate::infra::{parse_metric, InMemoryQuoteJournal};
use clap::Args;
use std::sync::Arc;
use taxdesk::config::AppConfig;
use taxdesk::error::AppError;
use taxdesk::pricing::{
    ClientType, Complexity, Location, LoyaltyLevel, PricingQuote, PricingService, QuoteRequest,
    SavingsEstimate,
};
use taxdesk::reports::{metric, InsightEngine, ReportInsights, ReportMetrics};

#[derive(Args, Debug, Default)]
pub(crate) struct QuoteArgs {
    /// Service type key from the rate tables (e.g. individual-basic)
    #[arg(long)]
    pub(crate) service_type: Option<String>,
    /// simple, moderate, complex or very-complex
    #[arg(long)]
    pub(crate) complexity: Option<String>,
    /// Request rush turnaround
    #[arg(long)]
    pub(crate) rush: bool,
    /// new, returning, vip or enterprise
    #[arg(long)]
    pub(crate) client_type: Option<String>,
    /// urban, suburban or rural
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Seasonal demand multiplier (defaults to 1.0)
    #[arg(long)]
    pub(crate) seasonal_factor: Option<f64>,
    /// bronze, silver, gold or platinum
    #[arg(long)]
    pub(crate) loyalty_level: Option<String>,
    /// Emit the full response as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl QuoteArgs {
    fn to_request(&self) -> QuoteRequest {
        QuoteRequest {
            service_type: self.service_type.clone(),
            complexity: self.complexity.as_deref().and_then(Complexity::parse),
            is_rush: self.rush,
            client_type: self.client_type.as_deref().and_then(ClientType::parse),
            location: self.location.as_deref().and_then(Location::parse),
            seasonal_factor: self.seasonal_factor,
            loyalty_level: self.loyalty_level.as_deref().and_then(LoyaltyLevel::parse),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Report identifier (tax-summary, revenue-trend, client-retention, campaign-performance, compliance)
    pub(crate) report_id: String,
    /// Metric as NAME=VALUE; repeat for each metric
    #[arg(long = "metric", value_parser = parse_metric)]
    pub(crate) metrics: Vec<(String, f64)>,
    /// Emit the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn pricing_service(
    config: &AppConfig,
) -> Result<PricingService<InMemoryQuoteJournal>, AppError> {
    let journal = Arc::new(InMemoryQuoteJournal::default());
    Ok(PricingService::from_config(&config.pricing, journal)?)
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = pricing_service(&config)?;
    let quote = service.quote(args.to_request())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        render_quote(args.service_type.as_deref(), &quote);
    }
    Ok(())
}

pub(crate) fn run_rates() -> Result<(), AppError> {
    let service = pricing_service(&AppConfig::load()?)?;
    println!("{}", serde_json::to_string_pretty(service.rate_tables())?);
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let metrics: ReportMetrics = args.metrics.into_iter().collect();
    let config = AppConfig::load()?;
    let engine = InsightEngine::from_config(&config.reports)?;
    let report = engine.generate(&args.report_id, &metrics)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = pricing_service(&config)?;

    println!("Pricing walkthrough");
    let scenarios = [
        (
            "First-time individual filer",
            QuoteRequest {
                service_type: Some("individual-basic".to_string()),
                complexity: Some(Complexity::Simple),
                client_type: Some(ClientType::New),
                location: Some(Location::Suburban),
                ..QuoteRequest::default()
            },
        ),
        (
            "Same filer with rush turnaround",
            QuoteRequest {
                service_type: Some("individual-basic".to_string()),
                complexity: Some(Complexity::Simple),
                is_rush: true,
                client_type: Some(ClientType::New),
                location: Some(Location::Suburban),
                ..QuoteRequest::default()
            },
        ),
        (
            "VIP gold member, complex premium return",
            QuoteRequest {
                service_type: Some("individual-premium".to_string()),
                complexity: Some(Complexity::Complex),
                client_type: Some(ClientType::Vip),
                location: Some(Location::Urban),
                loyalty_level: Some(LoyaltyLevel::Gold),
                ..QuoteRequest::default()
            },
        ),
        (
            "Enterprise business return in peak season",
            QuoteRequest {
                service_type: Some("business-premium".to_string()),
                complexity: Some(Complexity::VeryComplex),
                client_type: Some(ClientType::Enterprise),
                location: Some(Location::Urban),
                seasonal_factor: Some(1.15),
                loyalty_level: Some(LoyaltyLevel::Platinum),
                ..QuoteRequest::default()
            },
        ),
    ];

    for (label, request) in scenarios {
        println!("\n{label}");
        let service_type = request.service_type.clone();
        let quote = service.quote(request)?;
        render_quote(service_type.as_deref(), &quote);
    }

    println!("\nReport insights walkthrough");
    let engine = InsightEngine::from_config(&config.reports)?;
    let samples = [
        (
            "tax-summary",
            ReportMetrics::new()
                .with(metric::EFFECTIVE_TAX_RATE, 27.8)
                .with(metric::TOTAL_INCOME, 164_000.0)
                .with(metric::DEDUCTIONS, 12_500.0)
                .with(metric::REFUND_AMOUNT, 3_900.0),
        ),
        (
            "revenue-trend",
            ReportMetrics::new().with(metric::REVENUE_CHANGE_PCT, -14.2),
        ),
        (
            "compliance",
            ReportMetrics::new()
                .with(metric::COMPLIANCE_SCORE, 86.0)
                .with(metric::OPEN_FINDINGS, 3.0),
        ),
    ];

    for (report_id, metrics) in samples {
        println!();
        let report = engine.generate(report_id, &metrics)?;
        render_report(&report);
    }

    Ok(())
}

fn render_quote(service_type: Option<&str>, quote: &PricingQuote) {
    let pricing = &quote.pricing;
    println!(
        "Quote for {} ({})",
        service_type.unwrap_or("unspecified service"),
        quote.metadata.currency
    );
    println!("- Base price:            {:>10.2}", pricing.base_price);
    if pricing.complexity_adjustment != 0.0 {
        println!(
            "- Complexity adjustment: {:>10.2}",
            pricing.complexity_adjustment
        );
    }
    if pricing.location_adjustment != 0.0 {
        println!("- Location adjustment:   {:>10.2}", pricing.location_adjustment);
    }
    if pricing.seasonal_adjustment != 0.0 {
        println!("- Seasonal adjustment:   {:>10.2}", pricing.seasonal_adjustment);
    }
    if pricing.rush_fee > 0.0 {
        println!("- Rush fee:              {:>10.2}", pricing.rush_fee);
    }
    println!("- Subtotal:              {:>10.2}", pricing.subtotal);
    if pricing.total_discount > 0.0 {
        println!(
            "- Discount ({:.0}%):        {:>10.2}",
            pricing.discount_rate * 100.0,
            -pricing.total_discount
        );
    }
    println!("- Sales tax:             {:>10.2}", pricing.tax_amount);
    println!("- Processing fee:        {:>10.2}", pricing.processing_fee);
    println!("- Total:                 {:>10.2}", pricing.total);
    println!(
        "Valid until {}",
        quote.metadata.valid_until.format("%Y-%m-%d")
    );

    if !quote.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &quote.recommendations {
            let savings = match recommendation.estimate {
                SavingsEstimate::Savings(amount) => format!("saves {amount:.2}"),
                SavingsEstimate::PotentialSavings(amount) => {
                    format!("could save {amount:.2}")
                }
            };
            println!(
                "  - {} ({savings}): {}",
                recommendation.title, recommendation.description
            );
        }
    }
}

fn render_report(report: &ReportInsights) {
    println!(
        "{} insights | health score {}/100",
        report.report_label, report.health_score
    );

    if report.insights.is_empty() {
        println!("- No thresholds crossed");
    }
    for insight in &report.insights {
        println!(
            "- [{}] {}: {} (impact {}/10, confidence {}%)",
            insight.priority.label(),
            insight.title,
            insight.description,
            insight.impact,
            insight.confidence
        );
    }

    if !report.recommendations.is_empty() {
        println!("Recommended actions:");
        for recommendation in &report.recommendations {
            println!(
                "  - [{}] {} ({}): {}",
                recommendation.priority.label(),
                recommendation.title,
                recommendation.timeline,
                recommendation.description
            );
            for item in &recommendation.action_items {
                println!("      * {item}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_args_fall_back_on_unknown_tiers() {
        let args = QuoteArgs {
            service_type: Some("individual-basic".to_string()),
            complexity: Some("gnarly".to_string()),
            location: Some("Rural".to_string()),
            ..QuoteArgs::default()
        };

        let request = args.to_request();
        assert_eq!(request.complexity, None);
        assert_eq!(request.location, Some(Location::Rural));
        assert!(!request.is_rush);
    }
}
