use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::cheques::domain::{
    ChequeCollectionRequest, ChequeItem, ChequeRequestId, ChequeRequesterRole, PickupDetails,
};
use crate::cheques::payload::{
    ChequeCollectionSubmitPayload, ChequeCollectionSubmitResponse, CreateChequeRequest,
    UpdateChequeRequest,
};
use crate::cheques::provider::{
    ChequeCollectionProvider, MockChequeCollectionProvider, ProviderError, SubmissionContext,
};
use crate::cheques::repository::{
    ChequeRequestRepository, InMemoryChequeRepository, RepositoryError, RequestFilter,
};
use crate::cheques::router::{cheque_router, MockLatency};
use crate::cheques::service::ChequeCollectionService;

pub(super) fn build_service() -> (
    ChequeCollectionService<InMemoryChequeRepository>,
    Arc<InMemoryChequeRepository>,
) {
    let repository = Arc::new(InMemoryChequeRepository::seeded());
    let service =
        ChequeCollectionService::new(repository.clone(), Arc::new(MockChequeCollectionProvider));
    (service, repository)
}

pub(super) fn build_service_with_provider(
    provider: Arc<dyn ChequeCollectionProvider>,
) -> (
    ChequeCollectionService<InMemoryChequeRepository>,
    Arc<InMemoryChequeRepository>,
) {
    let repository = Arc::new(InMemoryChequeRepository::seeded());
    let service = ChequeCollectionService::new(repository.clone(), provider);
    (service, repository)
}

pub(super) fn router_with_service(
    service: ChequeCollectionService<InMemoryChequeRepository>,
) -> axum::Router {
    cheque_router(Arc::new(service), MockLatency::disabled())
}

pub(super) fn create_input() -> CreateChequeRequest {
    CreateChequeRequest {
        role: ChequeRequesterRole::PropertyManager,
        requester_user_id: "pm-042".to_string(),
    }
}

pub(super) fn cheque_item(id: &str, landlord: &str, property: &str) -> ChequeItem {
    ChequeItem {
        id: id.to_string(),
        cheque_number: Some("550021".to_string()),
        amount_aed: Some(30000.0),
        issuer_name: Some("Khalid Rahman".to_string()),
        bank_name: Some("FAB".to_string()),
        date: Some("2025-06-01".to_string()),
        landlord_id: landlord.to_string(),
        property_id: property.to_string(),
        images: Vec::new(),
        notes: None,
    }
}

pub(super) fn complete_pickup() -> PickupDetails {
    PickupDetails {
        contact_name: "Fatima Noor".to_string(),
        contact_phone: "+971509998877".to_string(),
        address_line1: "Business Bay, Bay Square Building 7".to_string(),
        city: Some("Dubai".to_string()),
        ..PickupDetails::default()
    }
}

/// Create a draft and fill it so that submit validation passes.
pub(super) fn ready_draft(
    service: &ChequeCollectionService<InMemoryChequeRepository>,
) -> ChequeCollectionRequest {
    let draft = service.create(create_input()).expect("draft created");
    service
        .update(
            &draft.id,
            UpdateChequeRequest {
                items: Some(vec![cheque_item("item-a", "LL-010", "PROP-900")]),
                pickup: Some(complete_pickup()),
                notes: None,
            },
        )
        .expect("draft updated")
}

#[derive(Debug)]
pub(super) struct OfflineBank;

#[async_trait]
impl ChequeCollectionProvider for OfflineBank {
    async fn submit(
        &self,
        _payload: &ChequeCollectionSubmitPayload,
        _ctx: &SubmissionContext,
    ) -> Result<ChequeCollectionSubmitResponse, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ChequeRequestRepository for UnavailableRepository {
    fn list(
        &self,
        _filter: &RequestFilter,
    ) -> Result<Vec<ChequeCollectionRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &ChequeRequestId,
    ) -> Result<Option<ChequeCollectionRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn insert(
        &self,
        _request: ChequeCollectionRequest,
    ) -> Result<ChequeCollectionRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn modify<F>(
        &self,
        _id: &ChequeRequestId,
        _change: F,
    ) -> Result<Option<ChequeCollectionRequest>, RepositoryError>
    where
        F: FnOnce(&mut ChequeCollectionRequest),
    {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
