use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ReportInsights, ReportMetrics};
use super::engine::InsightEngine;
use crate::error::AppError;

/// Body for `POST /reports/:report_id/insights`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub metrics: ReportMetrics,
}

/// Router builder exposing the report catalog and insight generation.
pub fn reports_router(engine: Arc<InsightEngine>) -> Router {
    Router::new()
        .route("/reports", get(catalog_handler))
        .route("/reports/:report_id/insights", post(insights_handler))
        .with_state(engine)
}

pub(crate) async fn catalog_handler(State(engine): State<Arc<InsightEngine>>) -> Response {
    (StatusCode::OK, Json(json!({ "reports": engine.catalog() }))).into_response()
}

pub(crate) async fn insights_handler(
    State(engine): State<Arc<InsightEngine>>,
    Path(report_id): Path<String>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Result<Json<ReportInsights>, AppError> {
    let Json(request) = payload?;
    let report = engine.generate(&report_id, &request.metrics)?;
    Ok(Json(report))
}
