//! HTTP surface of the `loan-schedule` and `loan-timeline` functions.
//!
//! Both accept `POST { applicationId? }` and answer `OPTIONS` for browser
//! preflight. A missing or unreadable body falls back to the demo application.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

use super::schedule::{generate_schedule, DEFAULT_APPLICATION_ID};
use super::timeline::generate_timeline;

pub const SCHEDULE_FUNCTION_PATH: &str = "/functions/v1/loan-schedule";
pub const TIMELINE_FUNCTION_PATH: &str = "/functions/v1/loan-timeline";

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Source of "now" for status derivation.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
struct FunctionState {
    clock: Clock,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionRequest {
    #[serde(default)]
    application_id: Option<String>,
}

pub fn loan_function_router() -> Router {
    loan_function_router_with_clock(Arc::new(Utc::now))
}

pub fn loan_function_router_with_clock(clock: Clock) -> Router {
    let router = Router::new()
        .route(
            SCHEDULE_FUNCTION_PATH,
            post(schedule_function).options(preflight),
        )
        .route(
            TIMELINE_FUNCTION_PATH,
            post(timeline_function).options(preflight),
        );
    with_cors_headers(router).with_state(FunctionState { clock })
}

/// Every response, including errors and preflight, carries the same CORS headers.
fn with_cors_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}

fn requested_application(body: &[u8]) -> String {
    serde_json::from_slice::<FunctionRequest>(body)
        .ok()
        .and_then(|request| request.application_id)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_APPLICATION_ID.to_string())
}

fn failure(message: &'static str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

async fn preflight() -> &'static str {
    "ok"
}

async fn schedule_function(State(state): State<FunctionState>, body: Bytes) -> Response {
    let application_id = requested_application(&body);
    match generate_schedule(&application_id, (state.clock)()) {
        Ok(schedule) => {
            info!(
                %application_id,
                installments = schedule.installments.len(),
                "generated loan schedule"
            );
            Json(schedule).into_response()
        }
        Err(err) => {
            error!(%application_id, error = %err, "loan schedule failed");
            failure("Failed to build schedule")
        }
    }
}

async fn timeline_function(State(state): State<FunctionState>, body: Bytes) -> Response {
    let application_id = requested_application(&body);
    match generate_timeline(&application_id, (state.clock)()) {
        Ok(timeline) => {
            info!(%application_id, events = timeline.events.len(), "generated loan timeline");
            Json(timeline).into_response()
        }
        Err(err) => {
            error!(%application_id, error = %err, "loan timeline failed");
            failure("Failed to build timeline")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use chrono::TimeZone;
    use serde_json::Value;
    use tower::ServiceExt;

    fn fixed_clock() -> Clock {
        Arc::new(|| {
            Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
                .single()
                .expect("valid instant")
        })
    }

    async fn call(method: Method, uri: &str, body: Body) -> Response {
        loan_function_router_with_clock(fixed_clock())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn malformed_bodies_fall_back_to_demo_application() {
        assert_eq!(requested_application(b""), "APP-1001");
        assert_eq!(requested_application(b"{not json"), "APP-1001");
        assert_eq!(requested_application(br#"{"applicationId":"  "}"#), "APP-1001");
        assert_eq!(
            requested_application(br#"{"applicationId":"APP-2002"}"#),
            "APP-2002"
        );
    }

    #[tokio::test]
    async fn schedule_function_returns_schedule_with_cors() {
        let response = call(
            Method::POST,
            SCHEDULE_FUNCTION_PATH,
            Body::from(r#"{"applicationId":"APP-2002"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        assert_eq!(
            headers
                .get_all(header::ACCESS_CONTROL_ALLOW_HEADERS)
                .iter()
                .count(),
            1
        );
        let body = json_body(response).await;
        assert_eq!(body["applicationId"], "APP-2002");
        assert_eq!(body["totalAmount"], 12_000);
        assert_eq!(body["totalPaid"], 4_000);
        assert_eq!(body["installments"][0]["id"], "APP-2002-INST-1");
        assert_eq!(body["installments"][1]["status"], "PAID");
        assert_eq!(body["installments"][2]["status"], "PENDING");
    }

    #[tokio::test]
    async fn schedule_function_defaults_when_body_missing() {
        let response = call(Method::POST, SCHEDULE_FUNCTION_PATH, Body::empty()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["applicationId"], "APP-1001");
        assert_eq!(body["installments"][1]["status"], "OVERDUE");
        assert_eq!(body["overdueFlag"], true);
    }

    #[tokio::test]
    async fn timeline_function_lists_milestones_and_installments() {
        let response = call(
            Method::POST,
            TIMELINE_FUNCTION_PATH,
            Body::from(r#"{"applicationId":"APP-2002"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let events = body["events"].as_array().expect("events");
        assert_eq!(events.len(), 10);
        assert_eq!(events[0]["type"], "APPLICATION");
        assert_eq!(events[3]["reference"], "TXN-APP-2002-001");
        assert_eq!(events[4]["installmentNumber"], 1);
    }

    #[tokio::test]
    async fn options_answers_with_cors_headers() {
        let response = call(Method::OPTIONS, SCHEDULE_FUNCTION_PATH, Body::empty()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "authorization, x-client-info, apikey, content-type"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    }

    #[tokio::test]
    async fn browser_preflight_gets_the_same_headers_as_plain_options() {
        let response = loan_function_router_with_clock(fixed_clock())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(TIMELINE_FUNCTION_PATH)
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "authorization, x-client-info, apikey, content-type"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn failures_carry_cors_headers() {
        let router: Router = with_cors_headers(Router::new().route(
            "/functions/v1/broken",
            post(|| async { failure("Failed to build schedule") }),
        ));
        let response = router
            .oneshot(
                Request::post("/functions/v1/broken")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to build schedule");
    }
}
