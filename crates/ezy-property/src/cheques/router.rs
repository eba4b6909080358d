use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::ChequeRequestId;
use super::errors::ChequeApiError;
use super::payload::{
    CreateChequeRequest, ImageUpload, ListChequeRequestsQuery, UpdateChequeRequest,
};
use super::provider::SubmissionContext;
use super::repository::{ChequeRequestRepository, RequestFilter};
use super::service::ChequeCollectionService;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Largest cheque scan accepted by the upload route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Artificial response delays mimicking a real backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub enabled: bool,
}

impl MockLatency {
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    async fn pause(self, millis: u64) {
        if self.enabled {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

pub struct ChequeRouterState<R> {
    pub service: Arc<ChequeCollectionService<R>>,
    pub latency: MockLatency,
}

impl<R> Clone for ChequeRouterState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            latency: self.latency,
        }
    }
}

/// Router builder exposing the mock cheque collection endpoints.
pub fn cheque_router<R>(service: Arc<ChequeCollectionService<R>>, latency: MockLatency) -> Router
where
    R: ChequeRequestRepository + 'static,
{
    Router::new()
        .route(
            "/api/cheques/requests",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/cheques/requests/:id",
            get(get_handler::<R>).put(update_handler::<R>),
        )
        .route(
            "/api/cheques/requests/:id/upload",
            post(upload_handler::<R>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/cheques/requests/:id/submit", post(submit_handler::<R>))
        .route("/api/cheques/requests/:id/cancel", post(cancel_handler::<R>))
        .with_state(ChequeRouterState { service, latency })
}

fn forced_error(headers: &HeaderMap) -> Result<(), ChequeApiError> {
    match ChequeApiError::from_headers(headers) {
        Some(error) => {
            tracing::info!(code = error.code.as_str(), "returning injected error");
            Err(error)
        }
        None => Ok(()),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) async fn list_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    headers: HeaderMap,
    query: Result<Query<ListChequeRequestsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(300).await;
    forced_error(&headers)?;

    let Query(query) =
        query.map_err(|rejection| ChequeApiError::validation(rejection.body_text()))?;
    let filter = RequestFilter {
        role: query.role,
        requester_user_id: query.user_id,
    };
    let requests = state.service.list(&filter)?;
    Ok(Json(json!({ "requests": requests })))
}

pub(crate) async fn get_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(200).await;
    forced_error(&headers)?;

    let request = state.service.get(&ChequeRequestId(id))?;
    Ok(Json(json!({ "request": request })))
}

pub(crate) async fn create_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    headers: HeaderMap,
    body: Result<Json<CreateChequeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(300).await;
    forced_error(&headers)?;

    let Json(input) =
        body.map_err(|rejection| ChequeApiError::validation(rejection.body_text()))?;
    let request = state.service.create(input)?;
    Ok((StatusCode::CREATED, Json(json!({ "request": request }))))
}

pub(crate) async fn update_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<UpdateChequeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(300).await;
    forced_error(&headers)?;

    let Json(changes) =
        body.map_err(|rejection| ChequeApiError::validation(rejection.body_text()))?;
    let request = state.service.update(&ChequeRequestId(id), changes)?;
    Ok(Json(json!({ "request": request })))
}

pub(crate) async fn upload_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(800).await;
    forced_error(&headers)?;

    let body = body.map_err(|rejection| {
        ChequeApiError::upload_rejected(rejection.status(), rejection.body_text())
    })?;

    let upload = ImageUpload {
        filename: header_value(&headers, FILE_NAME_HEADER),
        content_type: header_value(&headers, header::CONTENT_TYPE.as_str()),
        bytes: body.to_vec(),
    };
    let image = state.service.upload(&ChequeRequestId(id), upload)?;
    Ok((StatusCode::CREATED, Json(json!({ "image": image }))))
}

pub(crate) async fn submit_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(1000).await;
    forced_error(&headers)?;

    let ctx = match header_value(&headers, CORRELATION_ID_HEADER) {
        Some(correlation_id) => SubmissionContext { correlation_id },
        None => SubmissionContext::generated(),
    };
    let outcome = state.service.submit(&ChequeRequestId(id), &ctx).await?;
    Ok(Json(json!({
        "request": outcome.request,
        "scheduledAt": outcome.scheduled_at,
        "bankRef": outcome.bank_ref,
    })))
}

pub(crate) async fn cancel_handler<R>(
    State(state): State<ChequeRouterState<R>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ChequeApiError>
where
    R: ChequeRequestRepository + 'static,
{
    state.latency.pause(300).await;
    forced_error(&headers)?;

    let request = state.service.cancel(&ChequeRequestId(id))?;
    Ok(Json(json!({ "request": request })))
}
