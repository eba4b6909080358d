use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{ChequeCollectionRequest, ChequeRequestId, ChequeRequesterRole};
use super::fixtures;

/// Storage abstraction so the service can be exercised in isolation.
pub trait ChequeRequestRepository: Send + Sync {
    /// All requests matching the filter, newest first.
    fn list(&self, filter: &RequestFilter) -> Result<Vec<ChequeCollectionRequest>, RepositoryError>;
    fn fetch(
        &self,
        id: &ChequeRequestId,
    ) -> Result<Option<ChequeCollectionRequest>, RepositoryError>;
    fn insert(
        &self,
        request: ChequeCollectionRequest,
    ) -> Result<ChequeCollectionRequest, RepositoryError>;
    /// Apply `change` to the stored request while holding the store lock.
    /// Returns the updated request, or `None` when the id is unknown.
    fn modify<F>(
        &self,
        id: &ChequeRequestId,
        change: F,
    ) -> Result<Option<ChequeCollectionRequest>, RepositoryError>
    where
        F: FnOnce(&mut ChequeCollectionRequest);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub role: Option<ChequeRequesterRole>,
    pub requester_user_id: Option<String>,
}

impl RequestFilter {
    pub fn matches(&self, request: &ChequeCollectionRequest) -> bool {
        let role_matches = self.role.map_or(true, |role| request.role == role);
        let user_matches = self
            .requester_user_id
            .as_deref()
            .map_or(true, |user| request.requester_user_id == user);
        role_matches && user_matches
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Ordered in-memory list backing the mock API.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChequeRepository {
    requests: Arc<Mutex<Vec<ChequeCollectionRequest>>>,
}

impl InMemoryChequeRepository {
    pub fn new(requests: Vec<ChequeCollectionRequest>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(requests)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(fixtures::seed_requests())
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<ChequeCollectionRequest>>, RepositoryError> {
        self.requests
            .lock()
            .map_err(|_| RepositoryError::Unavailable("cheque store mutex poisoned".to_string()))
    }
}

impl ChequeRequestRepository for InMemoryChequeRepository {
    fn list(&self, filter: &RequestFilter) -> Result<Vec<ChequeCollectionRequest>, RepositoryError> {
        let guard = self.guard()?;
        let mut matching: Vec<ChequeCollectionRequest> = guard
            .iter()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn fetch(
        &self,
        id: &ChequeRequestId,
    ) -> Result<Option<ChequeCollectionRequest>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard.iter().find(|request| &request.id == id).cloned())
    }

    fn insert(
        &self,
        request: ChequeCollectionRequest,
    ) -> Result<ChequeCollectionRequest, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.iter().any(|existing| existing.id == request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(request.clone());
        Ok(request)
    }

    fn modify<F>(
        &self,
        id: &ChequeRequestId,
        change: F,
    ) -> Result<Option<ChequeCollectionRequest>, RepositoryError>
    where
        F: FnOnce(&mut ChequeCollectionRequest),
    {
        let mut guard = self.guard()?;
        Ok(guard
            .iter_mut()
            .find(|existing| &existing.id == id)
            .map(|slot| {
                change(slot);
                slot.clone()
            }))
    }
}
