use super::calculator::QuoteBreakdown;
use super::domain::QuoteRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issued quote as handed to the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub issued_at: DateTime<Utc>,
    pub request: QuoteRequest,
    pub breakdown: QuoteBreakdown,
}

/// Storage seam for issued quotes. Pricing never depends on it succeeding.
pub trait QuoteJournal: Send + Sync {
    fn record(&self, record: QuoteRecord) -> Result<(), JournalError>;
    /// Most recent records first, at most `limit` of them.
    fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, JournalError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("quote journal unavailable: {0}")]
    Unavailable(String),
}
