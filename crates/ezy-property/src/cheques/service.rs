use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use validator::Validate;

use super::domain::{
    ChequeCollectionRequest, ChequeCollectionStatus, ChequeImageMime, ChequeImageRef,
    ChequeRequestId,
};
use super::fixtures::{NEXT_IMAGE_SEQUENCE, NEXT_REQUEST_SEQUENCE};
use super::payload::{
    ChequeCollectionSubmitPayload, CreateChequeRequest, ImageUpload, UpdateChequeRequest,
};
use super::provider::{ChequeCollectionProvider, ProviderError, SubmissionContext};
use super::repository::{ChequeRequestRepository, RepositoryError, RequestFilter};

const PLACEHOLDER_URL: &str = "/placeholder.svg";
const SYNTHETIC_SIZE_RANGE: std::ops::Range<u64> = 100_000..600_000;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Result of a successful bank submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub request: ChequeCollectionRequest,
    pub scheduled_at: DateTime<Utc>,
    pub bank_ref: String,
}

/// Service composing the request store with the bank provider.
pub struct ChequeCollectionService<R> {
    repository: Arc<R>,
    provider: Arc<dyn ChequeCollectionProvider>,
    request_sequence: AtomicU64,
    image_sequence: AtomicU64,
}

impl<R> ChequeCollectionService<R>
where
    R: ChequeRequestRepository + 'static,
{
    /// Sequences continue after the seeded fixtures.
    pub fn new(repository: Arc<R>, provider: Arc<dyn ChequeCollectionProvider>) -> Self {
        Self::with_sequences(
            repository,
            provider,
            NEXT_REQUEST_SEQUENCE,
            NEXT_IMAGE_SEQUENCE,
        )
    }

    pub fn with_sequences(
        repository: Arc<R>,
        provider: Arc<dyn ChequeCollectionProvider>,
        next_request: u64,
        next_image: u64,
    ) -> Self {
        Self {
            repository,
            provider,
            request_sequence: AtomicU64::new(next_request),
            image_sequence: AtomicU64::new(next_image),
        }
    }

    pub fn list(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<ChequeCollectionRequest>, ChequeServiceError> {
        let requests = self.repository.list(filter)?;
        info!(
            role = ?filter.role,
            user_id = ?filter.requester_user_id,
            count = requests.len(),
            "listing cheque collection requests"
        );
        Ok(requests)
    }

    pub fn get(&self, id: &ChequeRequestId) -> Result<ChequeCollectionRequest, ChequeServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| ChequeServiceError::NotFound(id.clone()))
    }

    /// Open a new draft with no items and a blank pickup.
    pub fn create(
        &self,
        input: CreateChequeRequest,
    ) -> Result<ChequeCollectionRequest, ChequeServiceError> {
        let sequence = self.request_sequence.fetch_add(1, Ordering::Relaxed);
        let request = ChequeCollectionRequest::draft(
            ChequeRequestId::from_sequence(sequence),
            input.role,
            input.requester_user_id,
            Utc::now(),
        );

        let stored = self.repository.insert(request)?;
        info!(request_id = %stored.id, role = ?stored.role, "created cheque collection draft");
        Ok(stored)
    }

    /// Merge the supplied fields; derived id sets follow the items.
    pub fn update(
        &self,
        id: &ChequeRequestId,
        changes: UpdateChequeRequest,
    ) -> Result<ChequeCollectionRequest, ChequeServiceError> {
        if let Some(pickup) = &changes.pickup {
            pickup.validate().map_err(|errors| {
                ChequeServiceError::Validation(format!("Invalid pickup details: {errors}"))
            })?;
        }

        let UpdateChequeRequest {
            items,
            pickup,
            notes,
        } = changes;

        self.apply(id, |request| {
            if let Some(items) = items {
                request.replace_items(items);
            }
            if let Some(pickup) = pickup {
                request.pickup = pickup;
            }
            if notes.is_some() {
                request.notes = notes;
            }
            request.updated_at = Utc::now();
        })
    }

    /// Validate and forward to the bank. Resubmission issues a fresh reference.
    pub async fn submit(
        &self,
        id: &ChequeRequestId,
        ctx: &SubmissionContext,
    ) -> Result<SubmitOutcome, ChequeServiceError> {
        let request = self.get(id)?;
        ensure_submittable(&request)?;

        let payload = ChequeCollectionSubmitPayload::from(&request);
        info!(
            request_id = %id,
            correlation_id = %ctx.correlation_id,
            items = payload.items.len(),
            "submitting cheque collection to bank"
        );

        match self.provider.submit(&payload, ctx).await {
            Ok(response) => {
                let request = self.apply(id, |request| {
                    request.status = ChequeCollectionStatus::Scheduled;
                    request.scheduled_at = Some(response.scheduled_at);
                    request.bank_ref = Some(response.bank_ref.clone());
                    request.updated_at = Utc::now();
                })?;

                Ok(SubmitOutcome {
                    request,
                    scheduled_at: response.scheduled_at,
                    bank_ref: response.bank_ref,
                })
            }
            Err(err) => {
                warn!(
                    request_id = %id,
                    correlation_id = %ctx.correlation_id,
                    error = %err,
                    "bank submission failed"
                );
                self.apply(id, |request| {
                    request.status = ChequeCollectionStatus::Failed;
                    request.updated_at = Utc::now();
                })?;
                Err(ChequeServiceError::Provider(err))
            }
        }
    }

    /// Cancel regardless of the current status.
    pub fn cancel(
        &self,
        id: &ChequeRequestId,
    ) -> Result<ChequeCollectionRequest, ChequeServiceError> {
        let request = self.apply(id, |request| {
            request.status = ChequeCollectionStatus::Cancelled;
            request.updated_at = Utc::now();
        })?;
        info!(request_id = %id, "cancelled cheque collection request");
        Ok(request)
    }

    /// Register an uploaded cheque image. An empty upload yields synthetic metadata.
    pub fn upload(
        &self,
        id: &ChequeRequestId,
        upload: ImageUpload,
    ) -> Result<ChequeImageRef, ChequeServiceError> {
        self.get(id)?;

        let now = Utc::now();
        let image = if upload.bytes.is_empty() {
            synthetic_image(self.next_image_sequence(), now)
        } else {
            let mime_type = resolve_mime(&upload)?;
            stored_image(self.next_image_sequence(), now, mime_type, upload)
        };

        info!(
            request_id = %id,
            image_id = %image.id,
            size_bytes = image.size_bytes,
            "stored cheque image"
        );
        Ok(image)
    }

    fn next_image_sequence(&self) -> u64 {
        self.image_sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn apply<F>(
        &self,
        id: &ChequeRequestId,
        change: F,
    ) -> Result<ChequeCollectionRequest, ChequeServiceError>
    where
        F: FnOnce(&mut ChequeCollectionRequest),
    {
        self.repository
            .modify(id, change)?
            .ok_or_else(|| ChequeServiceError::NotFound(id.clone()))
    }
}

fn ensure_submittable(request: &ChequeCollectionRequest) -> Result<(), ChequeServiceError> {
    if request.items.is_empty() {
        return Err(ChequeServiceError::Validation(
            "Request must have at least one cheque item".to_string(),
        ));
    }
    if !request.pickup.has_contact() {
        return Err(ChequeServiceError::Validation(
            "Pickup details are incomplete".to_string(),
        ));
    }
    Ok(())
}

fn synthetic_image(sequence: u64, now: DateTime<Utc>) -> ChequeImageRef {
    let mut rng = rand::rng();
    let hash_suffix: String = (0..6)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();

    ChequeImageRef {
        id: format!("img-{sequence}"),
        filename: format!("cheque-{}.jpg", now.timestamp_millis()),
        mime_type: ChequeImageMime::Jpeg,
        size_bytes: rng.random_range(SYNTHETIC_SIZE_RANGE),
        hash: format!("hash-{hash_suffix}"),
        url: Some(PLACEHOLDER_URL.to_string()),
    }
}

fn stored_image(
    sequence: u64,
    now: DateTime<Utc>,
    mime_type: ChequeImageMime,
    upload: ImageUpload,
) -> ChequeImageRef {
    let filename = upload
        .filename
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "cheque-{}.{}",
                now.timestamp_millis(),
                mime_type.extension()
            )
        });
    let digest = Sha256::digest(&upload.bytes);

    ChequeImageRef {
        id: format!("img-{sequence}"),
        filename,
        mime_type,
        size_bytes: upload.bytes.len() as u64,
        hash: format!("{digest:x}"),
        url: Some(PLACEHOLDER_URL.to_string()),
    }
}

fn resolve_mime(upload: &ImageUpload) -> Result<ChequeImageMime, ChequeServiceError> {
    let declared = upload
        .content_type
        .as_deref()
        .and_then(|raw| raw.parse::<mime::Mime>().ok())
        .filter(|mime| *mime != mime::APPLICATION_OCTET_STREAM);
    let guessed = upload
        .filename
        .as_deref()
        .and_then(|name| mime_guess::from_path(name).first());

    match declared.or(guessed) {
        Some(mime) => ChequeImageMime::from_mime(&mime).ok_or_else(|| {
            ChequeServiceError::Validation(format!(
                "Unsupported file type {}; expected JPEG, PNG or PDF",
                mime.essence_str()
            ))
        }),
        None => Ok(ChequeImageMime::Jpeg),
    }
}

/// Error raised by the cheque collection service.
#[derive(Debug, thiserror::Error)]
pub enum ChequeServiceError {
    #[error("request {0} not found")]
    NotFound(ChequeRequestId),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
