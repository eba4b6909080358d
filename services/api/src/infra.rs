use chrono::{DateTime, Utc};
use ezy_property::cheques::{
    ChequeCollectionProvider, HttpChequeCollectionProvider, MockChequeCollectionProvider,
};
use ezy_property::config::{ChequeConfig, ChequeProviderKind};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn cheque_provider(config: &ChequeConfig) -> Arc<dyn ChequeCollectionProvider> {
    match config.provider {
        ChequeProviderKind::Mock => Arc::new(MockChequeCollectionProvider),
        ChequeProviderKind::Http => Arc::new(HttpChequeCollectionProvider::from_config(config)),
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("invalid RFC 3339 timestamp '{raw}': {err}"))
}
