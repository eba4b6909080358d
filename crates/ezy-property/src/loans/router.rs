use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::domain::{LoanSchedule, LoanTimeline};
use super::provider::{LoanProvider, LoanProviderError};

impl IntoResponse for LoanProviderError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "loan provider failed");
        let body = Json(json!({
            "error": {
                "code": "ERR_UPSTREAM_UNAVAILABLE",
                "message": self.to_string(),
                "module": "loans",
                "retriable": true,
            }
        }));
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

/// Read-only loan endpoints for the web client.
pub fn loan_router(provider: Arc<dyn LoanProvider>) -> Router {
    Router::new()
        .route("/api/loans/:application_id/schedule", get(schedule_handler))
        .route("/api/loans/:application_id/timeline", get(timeline_handler))
        .with_state(provider)
}

async fn schedule_handler(
    State(provider): State<Arc<dyn LoanProvider>>,
    Path(application_id): Path<String>,
) -> Result<Json<LoanSchedule>, LoanProviderError> {
    provider.get_schedule(&application_id).await.map(Json)
}

async fn timeline_handler(
    State(provider): State<Arc<dyn LoanProvider>>,
    Path(application_id): Path<String>,
) -> Result<Json<LoanTimeline>, LoanProviderError> {
    provider.get_timeline(&application_id).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::provider::{FixtureLoanProvider, RemoteLoanProvider};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
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
    async fn serves_fixture_schedule() {
        let router = loan_router(Arc::new(FixtureLoanProvider));
        let (status, body) = get_json(router, "/api/loans/APP-42/schedule").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applicationId"], "APP-42");
        assert_eq!(body["remainingBalance"], 80_000);
        assert_eq!(body["installments"][0]["paidAt"], "2024-01-14T00:00:00Z");
    }

    #[tokio::test]
    async fn serves_fixture_timeline() {
        let router = loan_router(Arc::new(FixtureLoanProvider));
        let (status, body) = get_json(router, "/api/loans/APP-42/timeline").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"][3]["type"], "DISBURSED");
        assert_eq!(body["events"][3]["amount"], 120_000);
    }

    #[tokio::test]
    async fn unreachable_functions_map_to_bad_gateway() {
        let router = loan_router(Arc::new(RemoteLoanProvider::new(
            "http://127.0.0.1:9/functions/v1",
        )));
        let (status, body) = get_json(router, "/api/loans/APP-42/schedule").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["module"], "loans");
        assert_eq!(body["error"]["retriable"], true);
    }
}
