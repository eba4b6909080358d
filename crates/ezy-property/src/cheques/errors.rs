use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::domain::ChequeRequestId;
use super::repository::RepositoryError;
use super::service::ChequeServiceError;

/// Header the web client sets to force an error path.
pub const FORCE_ERROR_HEADER: &str = "x-error-force-code";

const MODULE: &str = "cheques";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ErrUploadFailed,
    ErrUpstreamUnavailable,
    ErrValidation,
    ErrNotFound,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ErrUploadFailed => "ERR_UPLOAD_FAILED",
            ErrorCode::ErrUpstreamUnavailable => "ERR_UPSTREAM_UNAVAILABLE",
            ErrorCode::ErrValidation => "ERR_VALIDATION",
            ErrorCode::ErrNotFound => "ERR_NOT_FOUND",
        }
    }

    /// Codes a client may force through [`FORCE_ERROR_HEADER`].
    pub fn injectable(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ERR_UPLOAD_FAILED" => Some(ErrorCode::ErrUploadFailed),
            "ERR_UPSTREAM_UNAVAILABLE" => Some(ErrorCode::ErrUpstreamUnavailable),
            "ERR_VALIDATION" => Some(ErrorCode::ErrValidation),
            _ => None,
        }
    }
}

/// `{ error: { code, message, module, retriable? } }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChequeApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
    pub retriable: Option<bool>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: EnvelopeBody<'a>,
}

#[derive(Serialize)]
struct EnvelopeBody<'a> {
    code: ErrorCode,
    message: &'a str,
    module: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    retriable: Option<bool>,
}

impl ChequeApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: ErrorCode::ErrValidation,
            message: message.into(),
            retriable: None,
        }
    }

    pub fn not_found(id: &ChequeRequestId) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: ErrorCode::ErrNotFound,
            message: format!("Request {id} not found"),
            retriable: None,
        }
    }

    pub fn upload_failed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: ErrorCode::ErrUploadFailed,
            message: "Failed to upload file".to_string(),
            retriable: None,
        }
    }

    /// The upload body could not be read, e.g. it exceeds the size limit.
    pub fn upload_rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: ErrorCode::ErrUploadFailed,
            message: message.into(),
            retriable: None,
        }
    }

    pub fn upstream_unavailable(message: impl Into<String>, retriable: bool) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: ErrorCode::ErrUpstreamUnavailable,
            message: message.into(),
            retriable: Some(retriable),
        }
    }

    /// The error a forced code stands for.
    pub fn forced(code: ErrorCode) -> Self {
        match code {
            ErrorCode::ErrUploadFailed => Self::upload_failed(),
            ErrorCode::ErrUpstreamUnavailable => {
                Self::upstream_unavailable("Bank service is currently unavailable", true)
            }
            ErrorCode::ErrValidation => Self::validation("Forced validation failure"),
            ErrorCode::ErrNotFound => Self {
                status: StatusCode::NOT_FOUND,
                code,
                message: "Request not found".to_string(),
                retriable: None,
            },
        }
    }

    /// Returns the forced error when the request carries a known injection code.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(FORCE_ERROR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(ErrorCode::injectable)
            .map(Self::forced)
    }
}

impl From<ChequeServiceError> for ChequeApiError {
    fn from(error: ChequeServiceError) -> Self {
        match error {
            ChequeServiceError::NotFound(id) => Self::not_found(&id),
            ChequeServiceError::Validation(message) => Self::validation(message),
            ChequeServiceError::Provider(err) => {
                let retriable = err.retriable();
                Self::upstream_unavailable(err.to_string(), retriable)
            }
            ChequeServiceError::Repository(RepositoryError::Unavailable(detail)) => {
                tracing::error!(error = %detail, "cheque repository unavailable");
                Self::upstream_unavailable("Cheque store is unavailable", true)
            }
            ChequeServiceError::Repository(other) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: ErrorCode::ErrUpstreamUnavailable,
                message: other.to_string(),
                retriable: Some(false),
            },
        }
    }
}

impl IntoResponse for ChequeApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            error: EnvelopeBody {
                code: self.code,
                message: &self.message,
                module: MODULE,
                retriable: self.retriable,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn only_known_codes_are_injectable() {
        let mut headers = HeaderMap::new();
        headers.insert(FORCE_ERROR_HEADER, HeaderValue::from_static("ERR_TEAPOT"));
        assert!(ChequeApiError::from_headers(&headers).is_none());

        headers.insert(
            FORCE_ERROR_HEADER,
            HeaderValue::from_static("ERR_UPSTREAM_UNAVAILABLE"),
        );
        let forced = ChequeApiError::from_headers(&headers).expect("known code");
        assert_eq!(forced.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(forced.retriable, Some(true));
    }

    #[test]
    fn upload_failure_is_a_server_error() {
        let forced = ChequeApiError::forced(ErrorCode::ErrUploadFailed);
        assert_eq!(forced.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(forced.code.as_str(), "ERR_UPLOAD_FAILED");
        assert_eq!(forced.retriable, None);
    }
}
