use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ezy_property::cheques::{
    cheque_router, ChequeCollectionService, ChequeRequestRepository, MockLatency,
};
use ezy_property::loans::{loan_function_router, loan_router, LoanProvider};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<R>(
    service: Arc<ChequeCollectionService<R>>,
    latency: MockLatency,
    loans: Arc<dyn LoanProvider>,
) -> axum::Router
where
    R: ChequeRequestRepository + 'static,
{
    cheque_router(service, latency)
        .merge(loan_router(loans))
        .merge(loan_function_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use ezy_property::cheques::{InMemoryChequeRepository, MockChequeCollectionProvider};
    use ezy_property::loans::FixtureLoanProvider;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(ChequeCollectionService::new(
            Arc::new(InMemoryChequeRepository::seeded()),
            Arc::new(MockChequeCollectionProvider),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(
            service,
            MockLatency::disabled(),
            Arc::new(FixtureLoanProvider),
        )
        .layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn merged_router_serves_every_surface() {
        let (status, body) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = get(app(true), "/api/cheques/requests").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requests"].as_array().map(Vec::len), Some(3));

        let (status, body) = get(app(true), "/api/loans/APP-1001/schedule").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalAmount"], 120_000);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() {
        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
