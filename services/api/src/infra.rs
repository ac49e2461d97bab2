use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use taxdesk::pricing::{JournalError, QuoteJournal, QuoteRecord};

pub(crate) const JOURNAL_CAPACITY: usize = 500;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Bounded in-process journal; the oldest quotes are dropped once full.
#[derive(Clone)]
pub(crate) struct InMemoryQuoteJournal {
    records: Arc<Mutex<VecDeque<QuoteRecord>>>,
    capacity: usize,
}

impl Default for InMemoryQuoteJournal {
    fn default() -> Self {
        Self::with_capacity(JOURNAL_CAPACITY)
    }
}

impl InMemoryQuoteJournal {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl QuoteJournal for InMemoryQuoteJournal {
    fn record(&self, record: QuoteRecord) -> Result<(), JournalError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| JournalError::Unavailable("journal mutex poisoned".to_string()))?;
        if guard.len() == self.capacity {
            guard.pop_front();
        }
        guard.push_back(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, JournalError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| JournalError::Unavailable("journal mutex poisoned".to_string()))?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Parses a `name=value` CLI metric pair.
pub(crate) fn parse_metric(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("metric name missing in '{raw}'"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{value}' as a number ({err})"))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taxdesk::pricing::{compute_quote, QuoteRequest, RateTables, SurchargeRates};

    fn record(service: &str) -> QuoteRecord {
        let request = QuoteRequest::for_service(service);
        let breakdown = compute_quote(&RateTables::standard(), &SurchargeRates::STANDARD, &request);
        QuoteRecord {
            issued_at: Utc::now(),
            request,
            breakdown,
        }
    }

    #[test]
    fn journal_drops_oldest_when_full() {
        let journal = InMemoryQuoteJournal::with_capacity(2);
        journal.record(record("individual-basic")).expect("record");
        journal.record(record("business-basic")).expect("record");
        journal.record(record("tax-planning")).expect("record");

        assert_eq!(journal.len(), 2);
        let recent = journal.recent(10).expect("recent");
        assert_eq!(recent[0].request.service_type(), Some("tax-planning"));
        assert_eq!(recent[1].request.service_type(), Some("business-basic"));
    }

    #[test]
    fn parse_metric_accepts_name_value_pairs() {
        assert_eq!(
            parse_metric("effectiveTaxRate=27.5"),
            Ok(("effectiveTaxRate".to_string(), 27.5))
        );
        assert!(parse_metric("effectiveTaxRate").is_err());
        assert!(parse_metric("=3").is_err());
        assert!(parse_metric("openFindings=many").is_err());
    }
}
