use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::pricing::domain::{ClientType, Complexity, Location, LoyaltyLevel, QuoteRequest};
use crate::pricing::journal::{JournalError, QuoteJournal, QuoteRecord};
use crate::pricing::rates::{RateTables, SurchargeRates};
use crate::pricing::{compute_quote, QuoteBreakdown, PricingService};

#[derive(Default, Clone)]
pub(super) struct MemoryJournal {
    records: Arc<Mutex<Vec<QuoteRecord>>>,
}

impl MemoryJournal {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("journal mutex poisoned").len()
    }
}

impl QuoteJournal for MemoryJournal {
    fn record(&self, record: QuoteRecord) -> Result<(), JournalError> {
        self.records
            .lock()
            .expect("journal mutex poisoned")
            .push(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, JournalError> {
        let guard = self.records.lock().expect("journal mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(super) struct OfflineJournal;

impl QuoteJournal for OfflineJournal {
    fn record(&self, _record: QuoteRecord) -> Result<(), JournalError> {
        Err(JournalError::Unavailable("ledger offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<QuoteRecord>, JournalError> {
        Err(JournalError::Unavailable("ledger offline".to_string()))
    }
}

pub(super) fn build_service() -> (PricingService<MemoryJournal>, MemoryJournal) {
    let journal = MemoryJournal::default();
    let service = PricingService::new(RateTables::standard(), Arc::new(journal.clone()));
    (service, journal)
}

pub(super) fn quote(request: &QuoteRequest) -> QuoteBreakdown {
    compute_quote(&RateTables::standard(), &SurchargeRates::STANDARD, request)
}

/// First-time individual filer in a suburban office, no rush.
pub(super) fn basic_individual_request() -> QuoteRequest {
    QuoteRequest {
        service_type: Some("individual-basic".to_string()),
        complexity: Some(Complexity::Simple),
        is_rush: false,
        client_type: Some(ClientType::New),
        location: Some(Location::Suburban),
        seasonal_factor: None,
        loyalty_level: None,
    }
}

pub(super) fn vip_gold_request() -> QuoteRequest {
    QuoteRequest {
        client_type: Some(ClientType::Vip),
        loyalty_level: Some(LoyaltyLevel::Gold),
        ..basic_individual_request()
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
