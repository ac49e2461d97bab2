use super::calculator::QuoteBreakdown;
use super::domain::{ClientType, QuoteRequest};
use serde::{Deserialize, Serialize};

const STANDARD_PROCESSING_THRESHOLD: f64 = 500.0;
const BUNDLE_THRESHOLD: f64 = 200.0;
const BUNDLE_SAVINGS: f64 = 200.0;
const LOYALTY_PROGRAM_RATE: f64 = 0.05;
const ACH_FEE_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Timing,
    Loyalty,
    Bundle,
    Payment,
}

/// Either money the client saves outright or money they could save by enrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SavingsEstimate {
    Savings(f64),
    PotentialSavings(f64),
}

impl SavingsEstimate {
    pub fn amount(self) -> f64 {
        match self {
            Self::Savings(amount) | Self::PotentialSavings(amount) => amount,
        }
    }
}

/// Flat upsell record returned alongside a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub estimate: SavingsEstimate,
}

pub fn generate_recommendations(
    request: &QuoteRequest,
    breakdown: &QuoteBreakdown,
) -> Vec<QuoteRecommendation> {
    let mut recommendations = Vec::new();

    if !request.is_rush && breakdown.total > STANDARD_PROCESSING_THRESHOLD {
        recommendations.push(QuoteRecommendation {
            kind: RecommendationKind::Timing,
            title: "Standard processing".to_string(),
            description: "Standard turnaround keeps this engagement free of rush charges"
                .to_string(),
            estimate: SavingsEstimate::Savings(breakdown.rush_fee),
        });
    }

    if request.client_type == Some(ClientType::New) {
        recommendations.push(QuoteRecommendation {
            kind: RecommendationKind::Loyalty,
            title: "Join the loyalty program".to_string(),
            description: "Enroll today to receive loyalty discounts on future filings"
                .to_string(),
            estimate: SavingsEstimate::PotentialSavings(breakdown.subtotal * LOYALTY_PROGRAM_RATE),
        });
    }

    let individual_service = request
        .service_type()
        .map(|service| service.contains("individual"))
        .unwrap_or(false);
    if individual_service && breakdown.total > BUNDLE_THRESHOLD {
        recommendations.push(QuoteRecommendation {
            kind: RecommendationKind::Bundle,
            title: "Add year-round tax planning".to_string(),
            description: "Bundle preparation with tax planning for a reduced combined fee"
                .to_string(),
            estimate: SavingsEstimate::Savings(BUNDLE_SAVINGS),
        });
    }

    recommendations.push(QuoteRecommendation {
        kind: RecommendationKind::Payment,
        title: "Pay by ACH transfer".to_string(),
        description: "Bank transfers avoid most of the card processing fee".to_string(),
        estimate: SavingsEstimate::Savings(breakdown.processing_fee * ACH_FEE_SHARE),
    });

    recommendations
}
