use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryQuoteJournal};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use taxdesk::config::AppConfig;
use taxdesk::error::AppError;
use taxdesk::pricing::PricingService;
use taxdesk::reports::InsightEngine;
use taxdesk::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let journal = Arc::new(InMemoryQuoteJournal::default());
    let pricing = Arc::new(PricingService::from_config(&config.pricing, journal)?);
    let insights = Arc::new(InsightEngine::from_config(&config.reports)?);

    let app = with_service_routes(pricing, insights)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rate_tables = ?config.pricing.rate_tables_path,
        report_thresholds = ?config.reports.thresholds_path,
        "pricing service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
