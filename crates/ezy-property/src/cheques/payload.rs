use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ChequeCollectionRequest, ChequeItem, ChequeRequesterRole, PickupDetails,
};

/// Body forwarded to the bank's cheque collection API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeCollectionSubmitPayload {
    pub request_id: String,
    pub pickup: PickupDetails,
    pub items: Vec<SubmitItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "amountAED")]
    pub amount_aed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord_external_id: Option<String>,
    /// Listing id on the public property site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_external_id: Option<String>,
    pub images: Vec<SubmitImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitImage {
    pub file_id: String,
    pub hash: String,
}

/// Bank acknowledgement for an accepted pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeCollectionSubmitResponse {
    pub bank_ref: String,
    pub scheduled_at: DateTime<Utc>,
}

impl From<&ChequeItem> for SubmitItem {
    fn from(item: &ChequeItem) -> Self {
        Self {
            cheque_number: item.cheque_number.clone(),
            amount_aed: item.amount_aed,
            issuer_name: item.issuer_name.clone(),
            bank_name: item.bank_name.clone(),
            date: item.date.clone(),
            landlord_external_id: Some(item.landlord_id.clone()),
            property_external_id: Some(item.property_id.clone()),
            images: item
                .images
                .iter()
                .map(|image| SubmitImage {
                    file_id: image.id.clone(),
                    hash: image.hash.clone(),
                })
                .collect(),
        }
    }
}

impl From<&ChequeCollectionRequest> for ChequeCollectionSubmitPayload {
    fn from(request: &ChequeCollectionRequest) -> Self {
        Self {
            request_id: request.id.0.clone(),
            pickup: request.pickup.clone(),
            items: request.items.iter().map(SubmitItem::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChequeRequest {
    pub role: ChequeRequesterRole,
    #[serde(default)]
    pub requester_user_id: String,
}

/// Partial update. Derived id sets and status are not client settable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChequeRequest {
    #[serde(default)]
    pub items: Option<Vec<ChequeItem>>,
    #[serde(default)]
    pub pickup: Option<PickupDetails>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChequeRequestsQuery {
    #[serde(default)]
    pub role: Option<ChequeRequesterRole>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// File handed to the upload route. An empty body yields a synthetic image.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cheques::fixtures;

    #[test]
    fn payload_carries_image_hashes_and_external_ids() {
        let request = fixtures::seed_requests()
            .into_iter()
            .find(|request| !request.items.is_empty())
            .expect("fixture with items");
        let payload = ChequeCollectionSubmitPayload::from(&request);

        assert_eq!(payload.request_id, request.id.0);
        assert_eq!(payload.items.len(), request.items.len());
        let first = &payload.items[0];
        assert_eq!(
            first.landlord_external_id.as_deref(),
            Some(request.items[0].landlord_id.as_str())
        );
        assert_eq!(first.images.len(), request.items[0].images.len());
    }

    #[test]
    fn update_body_ignores_status_and_derived_fields() {
        let raw = serde_json::json!({
            "status": "SCHEDULED",
            "landlordIds": ["LL-X"],
            "notes": "ring the bell",
        });
        let update: UpdateChequeRequest = serde_json::from_value(raw).expect("parses");
        assert_eq!(update.notes.as_deref(), Some("ring the bell"));
        assert!(update.items.is_none());
        assert!(update.pickup.is_none());
    }
}
