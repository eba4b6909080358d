use crate::cli::ServeArgs;
use crate::infra::{cheque_provider, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ezy_property::cheques::{ChequeCollectionService, InMemoryChequeRepository, MockLatency};
use ezy_property::config::AppConfig;
use ezy_property::error::AppError;
use ezy_property::loans::provider_from_config;
use ezy_property::telemetry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryChequeRepository::seeded());
    let cheque_service = Arc::new(ChequeCollectionService::new(
        repository,
        cheque_provider(&config.cheques),
    ));
    let latency = if config.cheques.mock_latency {
        MockLatency::enabled()
    } else {
        MockLatency::disabled()
    };
    let loans = provider_from_config(&config.loans, &config.server);

    let app = with_service_routes(cheque_service, latency, loans)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        provider = ?config.cheques.provider,
        auth_disabled = config.loans.auth_disabled,
        functions_url = %config.loans.functions_url_for(&config.server),
        "ezy property api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
