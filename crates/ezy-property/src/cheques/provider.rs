//! Bank-side cheque collection adapters.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

use super::payload::{ChequeCollectionSubmitPayload, ChequeCollectionSubmitResponse};
use crate::config::ChequeConfig;

/// Tracing context threaded through a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub correlation_id: String,
}

impl SubmissionContext {
    pub fn generated() -> Self {
        Self {
            correlation_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} not yet implemented")]
    NotImplemented(&'static str),
    #[error("bank service unavailable: {0}")]
    Unavailable(String),
    #[error("bank rejected submission: {0}")]
    Rejected(String),
}

impl ProviderError {
    pub fn retriable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }
}

/// Contract for forwarding a collection request to the bank.
#[async_trait]
pub trait ChequeCollectionProvider: Send + Sync + std::fmt::Debug {
    async fn submit(
        &self,
        payload: &ChequeCollectionSubmitPayload,
        ctx: &SubmissionContext,
    ) -> Result<ChequeCollectionSubmitResponse, ProviderError>;
}

/// Pickup slot offered by the bank: 10:30 on the following day.
pub fn next_day_pickup(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| now.date_naive());
    let slot = NaiveTime::from_hms_opt(10, 30, 0).unwrap_or_default();
    tomorrow.and_time(slot).and_utc()
}

/// `BANK-CHQ-<epoch millis>-<random suffix>`
pub fn generate_bank_ref(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("BANK-CHQ-{}-{}", now.timestamp_millis(), suffix)
}

/// Simulated bank used by the mock API.
#[derive(Debug, Default, Clone)]
pub struct MockChequeCollectionProvider;

#[async_trait]
impl ChequeCollectionProvider for MockChequeCollectionProvider {
    async fn submit(
        &self,
        payload: &ChequeCollectionSubmitPayload,
        ctx: &SubmissionContext,
    ) -> Result<ChequeCollectionSubmitResponse, ProviderError> {
        let now = Utc::now();
        let response = ChequeCollectionSubmitResponse {
            bank_ref: generate_bank_ref(now),
            scheduled_at: next_day_pickup(now),
        };
        info!(
            request_id = %payload.request_id,
            correlation_id = %ctx.correlation_id,
            bank_ref = %response.bank_ref,
            "mock bank accepted cheque collection"
        );
        Ok(response)
    }
}

/// Adapter for the bank's HTTP API. Pending the bank integration it only logs.
#[derive(Clone)]
pub struct HttpChequeCollectionProvider {
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpChequeCollectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChequeCollectionProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HttpChequeCollectionProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &ChequeConfig) -> Self {
        Self::new(config.bank_base_url.clone(), config.bank_api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChequeCollectionProvider for HttpChequeCollectionProvider {
    async fn submit(
        &self,
        payload: &ChequeCollectionSubmitPayload,
        ctx: &SubmissionContext,
    ) -> Result<ChequeCollectionSubmitResponse, ProviderError> {
        info!(
            request_id = %payload.request_id,
            items_count = payload.items.len(),
            correlation_id = %ctx.correlation_id,
            base_url = %self.base_url,
            has_api_key = !self.api_key.is_empty(),
            "submitting cheque collection request"
        );

        // TODO: POST to `{base_url}/cheque-collection` with bearer auth and
        // X-Correlation-ID once the bank publishes its API contract.
        warn!(
            correlation_id = %ctx.correlation_id,
            "bank cheque collection API is not wired up"
        );
        Err(ProviderError::NotImplemented(
            "HTTP cheque collection provider",
        ))
    }
}
