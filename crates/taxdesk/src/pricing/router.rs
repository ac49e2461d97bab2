use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::QuoteRequest;
use super::journal::QuoteJournal;
use super::service::PricingService;

pub const PRICING_FAILURE_MESSAGE: &str = "Failed to calculate pricing";
const DEFAULT_RECENT_LIMIT: usize = 20;
const MAX_RECENT_LIMIT: usize = 200;

/// Router builder exposing quote calculation and the rate tables.
pub fn pricing_router<J>(service: Arc<PricingService<J>>) -> Router
where
    J: QuoteJournal + 'static,
{
    Router::new()
        .route(
            "/pricing",
            get(rate_tables_handler::<J>).post(quote_handler::<J>),
        )
        .route("/pricing/quotes", get(recent_quotes_handler::<J>))
        .with_state(service)
}

pub(crate) async fn quote_handler<J>(
    State(service): State<Arc<PricingService<J>>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Response
where
    J: QuoteJournal + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected pricing request body");
            return pricing_failure();
        }
    };

    match service.quote(request) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(err) => {
            warn!(error = %err, "quote could not be priced");
            pricing_failure()
        }
    }
}

fn pricing_failure() -> Response {
    let payload = json!({
        "success": false,
        "error": PRICING_FAILURE_MESSAGE,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

pub(crate) async fn rate_tables_handler<J>(
    State(service): State<Arc<PricingService<J>>>,
) -> Response
where
    J: QuoteJournal + 'static,
{
    (StatusCode::OK, Json(service.rate_tables().clone())).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecentQuotesQuery {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn recent_quotes_handler<J>(
    State(service): State<Arc<PricingService<J>>>,
    Query(query): Query<RecentQuotesQuery>,
) -> Response
where
    J: QuoteJournal + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);

    match service.recent_quotes(limit) {
        Ok(records) => (StatusCode::OK, Json(json!({ "quotes": records }))).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}
