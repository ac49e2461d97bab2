//! End-to-end quote scenarios driven through the public service facade and HTTP router.

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use taxdesk::config::PricingConfig;
use taxdesk::pricing::{
    pricing_router, ClientType, Complexity, JournalError, Location, LoyaltyLevel, PricingService,
    QuoteJournal, QuoteRecord, QuoteRequest, RateTables, RecommendationKind,
};

#[derive(Default, Clone)]
struct RecordingJournal {
    records: Arc<Mutex<Vec<QuoteRecord>>>,
}

impl QuoteJournal for RecordingJournal {
    fn record(&self, record: QuoteRecord) -> Result<(), JournalError> {
        self.records.lock().expect("journal poisoned").push(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<QuoteRecord>, JournalError> {
        let guard = self.records.lock().expect("journal poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

fn service() -> (PricingService<RecordingJournal>, RecordingJournal) {
    let journal = RecordingJournal::default();
    (
        PricingService::new(RateTables::standard(), Arc::new(journal.clone())),
        journal,
    )
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}

#[test]
fn quote_metadata_reflects_validity_window() {
    let (service, journal) = service();
    let service = service.with_validity_days(14).with_rate_version("2025-season");
    let now = Utc.with_ymd_and_hms(2025, 2, 3, 15, 30, 0).unwrap();

    let quote = service.quote_at(
        QuoteRequest {
            service_type: Some("individual-premium".to_string()),
            complexity: Some(Complexity::Moderate),
            is_rush: false,
            client_type: Some(ClientType::Returning),
            location: Some(Location::Urban),
            seasonal_factor: Some(1.1),
            loyalty_level: Some(LoyaltyLevel::Silver),
        },
        now,
    )
    .expect("quote prices");

    assert!(quote.success);
    assert_eq!(quote.metadata.calculated_at, now);
    assert_eq!(quote.metadata.valid_until, now + Duration::days(14));
    assert_eq!(quote.metadata.rate_version, "2025-season");
    assert_eq!(quote.metadata.applied_rates.complexity_multiplier, Some(1.3));
    assert!((quote.metadata.applied_rates.discount_rate - 0.10).abs() < 1e-9);

    let records = journal.records.lock().expect("journal poisoned");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].issued_at, now);
    assert_eq!(records[0].breakdown, quote.pricing);
}

#[test]
fn very_complex_business_quote_recommends_standard_processing_first() {
    let (service, _) = service();
    let quote = service.quote(QuoteRequest {
        service_type: Some("business-premium".to_string()),
        complexity: Some(Complexity::VeryComplex),
        client_type: Some(ClientType::Enterprise),
        loyalty_level: Some(LoyaltyLevel::Platinum),
        ..QuoteRequest::default()
    })
    .expect("quote prices");

    let kinds: Vec<RecommendationKind> = quote
        .recommendations
        .iter()
        .map(|recommendation| recommendation.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![RecommendationKind::Timing, RecommendationKind::Payment]
    );
}

#[test]
fn service_loads_rate_tables_from_configured_file() {
    let path = std::env::temp_dir().join(format!("taxdesk-rates-{}.json", std::process::id()));
    let mut tables = RateTables::standard();
    tables
        .base_pricing
        .insert("individual-basic".to_string(), 249.0);
    std::fs::write(&path, serde_json::to_vec(&tables).expect("encode")).expect("write tables");

    let config = PricingConfig {
        rate_tables_path: Some(path.clone()),
        ..PricingConfig::default()
    };
    let service = PricingService::from_config(&config, Arc::new(RecordingJournal::default()))
        .expect("service builds");
    std::fs::remove_file(&path).ok();

    let quote = service
        .quote(QuoteRequest::for_service("individual-basic"))
        .expect("quote prices");
    assert_eq!(quote.pricing.base_price, 249.0);
    assert!(quote.metadata.rate_version.starts_with("taxdesk-rates-"));
}

#[tokio::test]
async fn pricing_routes_round_trip_over_http() {
    let (service, _) = service();
    let router = pricing_router(Arc::new(service));

    let quote = router
        .clone()
        .oneshot(
            Request::post("/pricing")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({
                        "serviceType": "individual-basic",
                        "complexity": "simple",
                        "isRush": true,
                        "clientType": "new",
                        "location": "suburban"
                    }))
                    .expect("encode"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(quote.status(), StatusCode::OK);
    let body = read_json(quote).await;
    assert_eq!(body["pricing"]["rushFee"], json!(50.0));
    assert_eq!(body["pricing"]["total"], json!(277.36));
    assert!(body["metadata"]["validUntil"].is_string());

    let rates = router
        .clone()
        .oneshot(Request::get("/pricing").body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");
    let rates = read_json(rates).await;
    assert_eq!(rates["basePricing"]["individual-basic"], json!(199.0));
    assert_eq!(rates["rushFees"]["individual-basic"], json!(50.0));

    let recent = router
        .oneshot(
            Request::get("/pricing/quotes")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let recent = read_json(recent).await;
    assert_eq!(recent["quotes"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn wrong_field_types_surface_the_opaque_failure() {
    let (service, _) = service();
    let router = pricing_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::post("/pricing")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"serviceType": "individual-basic", "isRush": "yes"}"#))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Failed to calculate pricing"));
}
