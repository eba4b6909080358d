use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use super::domain::{LoanSchedule, LoanTimeline};
use super::fixtures;
use crate::config::{LoanConfig, ServerConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoanProviderError {
    #[error("loan function request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("loan function {function} returned {status}: {body}")]
    Function {
        function: &'static str,
        status: u16,
        body: String,
    },
}

/// Read-only loan projections keyed by application id.
#[async_trait]
pub trait LoanProvider: Send + Sync {
    async fn get_schedule(&self, application_id: &str) -> Result<LoanSchedule, LoanProviderError>;
    async fn get_timeline(&self, application_id: &str) -> Result<LoanTimeline, LoanProviderError>;
}

/// Serves canned data without touching the network.
#[derive(Debug, Default, Clone)]
pub struct FixtureLoanProvider;

#[async_trait]
impl LoanProvider for FixtureLoanProvider {
    async fn get_schedule(&self, application_id: &str) -> Result<LoanSchedule, LoanProviderError> {
        info!(application_id, "auth disabled, returning mock schedule data");
        Ok(fixtures::mock_schedule(application_id))
    }

    async fn get_timeline(&self, application_id: &str) -> Result<LoanTimeline, LoanProviderError> {
        info!(application_id, "auth disabled, returning mock timeline data");
        Ok(fixtures::mock_timeline(application_id))
    }
}

/// Invokes the hosted `loan-schedule` / `loan-timeline` functions.
#[derive(Debug, Clone)]
pub struct RemoteLoanProvider {
    client: reqwest::Client,
    functions_url: String,
}

impl RemoteLoanProvider {
    pub fn new(functions_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), functions_url)
    }

    pub fn with_client(client: reqwest::Client, functions_url: impl Into<String>) -> Self {
        Self {
            client,
            functions_url: functions_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        function: &'static str,
        application_id: &str,
    ) -> Result<T, LoanProviderError> {
        let url = format!("{}/{function}", self.functions_url);
        debug!(%url, application_id, "invoking loan function");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "applicationId": application_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoanProviderError::Function {
                function,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl LoanProvider for RemoteLoanProvider {
    async fn get_schedule(&self, application_id: &str) -> Result<LoanSchedule, LoanProviderError> {
        self.invoke("loan-schedule", application_id).await
    }

    async fn get_timeline(&self, application_id: &str) -> Result<LoanTimeline, LoanProviderError> {
        self.invoke("loan-timeline", application_id).await
    }
}

/// Pick the loan data source for the current configuration.
///
/// `server` must already carry any CLI host/port overrides.
pub fn provider_from_config(loans: &LoanConfig, server: &ServerConfig) -> Arc<dyn LoanProvider> {
    if loans.auth_disabled {
        Arc::new(FixtureLoanProvider)
    } else {
        Arc::new(RemoteLoanProvider::new(loans.functions_url_for(server)))
    }
}
