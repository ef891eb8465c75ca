use crate::cli::ServeArgs;
use crate::infra::{
    default_underwriting_config, seed_reference_data, AppState, InMemoryApplicationRepository,
    InMemoryEventSink,
};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mortgage_core::config::AppConfig;
use mortgage_core::error::AppError;
use mortgage_core::telemetry;
use mortgage_core::workflows::origination::MortgageApplicationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let repository = Arc::new(InMemoryApplicationRepository::default());
    seed_reference_data(&repository);
    let events = Arc::new(InMemoryEventSink::default());
    let application_service = Arc::new(MortgageApplicationService::new(
        repository,
        events,
        default_underwriting_config(),
    ));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mortgage origination service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
