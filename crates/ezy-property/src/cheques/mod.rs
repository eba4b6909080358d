//! Cheque collection requests: schemas, the mock request store, and the bank
//! submission contract.

pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod payload;
pub mod provider;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ChequeCollectionRequest, ChequeCollectionStatus, ChequeImageMime, ChequeImageRef, ChequeItem,
    ChequeRequestId, ChequeRequesterRole, PickupDetails, PickupWindow,
};
pub use errors::{ChequeApiError, ErrorCode, FORCE_ERROR_HEADER};
pub use payload::{
    ChequeCollectionSubmitPayload, ChequeCollectionSubmitResponse, CreateChequeRequest,
    ImageUpload, ListChequeRequestsQuery, UpdateChequeRequest,
};
pub use provider::{
    ChequeCollectionProvider, HttpChequeCollectionProvider, MockChequeCollectionProvider,
    ProviderError, SubmissionContext,
};
pub use repository::{
    ChequeRequestRepository, InMemoryChequeRepository, RepositoryError, RequestFilter,
};
pub use router::{
    cheque_router, MockLatency, CORRELATION_ID_HEADER, FILE_NAME_HEADER, MAX_UPLOAD_BYTES,
};
pub use service::{ChequeCollectionService, ChequeServiceError, SubmitOutcome};
