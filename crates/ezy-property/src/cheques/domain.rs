use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use validator::{Validate, ValidationError};

/// Identifier wrapper for cheque collection requests (`CHQ-REQ-xxxx`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChequeRequestId(pub String);

impl ChequeRequestId {
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("CHQ-REQ-{sequence}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChequeRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// MIME types accepted for scanned cheques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChequeImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "application/pdf")]
    Pdf,
}

impl ChequeImageMime {
    pub const fn essence(self) -> &'static str {
        match self {
            ChequeImageMime::Jpeg => "image/jpeg",
            ChequeImageMime::Png => "image/png",
            ChequeImageMime::Pdf => "application/pdf",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            ChequeImageMime::Jpeg => "jpg",
            ChequeImageMime::Png => "png",
            ChequeImageMime::Pdf => "pdf",
        }
    }

    /// Map a parsed media type onto the accepted set, ignoring parameters.
    pub fn from_mime(mime: &mime::Mime) -> Option<Self> {
        let (kind, subtype) = (mime.type_(), mime.subtype());
        if kind == mime::IMAGE && subtype == mime::JPEG {
            Some(Self::Jpeg)
        } else if kind == mime::IMAGE && subtype == mime::PNG {
            Some(Self::Png)
        } else if kind == mime::APPLICATION && subtype == mime::PDF {
            Some(Self::Pdf)
        } else {
            None
        }
    }
}

/// Uploaded image metadata attached to a cheque item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeImageRef {
    pub id: String,
    pub filename: String,
    pub mime_type: ChequeImageMime,
    pub size_bytes: u64,
    /// sha256 of the file contents.
    pub hash: String,
    /// Signed URL, mock/dev only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single paper cheque to be collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "amountAED")]
    pub amount_aed: Option<f64>,
    /// Drawer of the cheque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub landlord_id: String,
    pub property_id: String,
    #[serde(default)]
    pub images: Vec<ChequeImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupWindow {
    pub start: String,
    pub end: String,
}

/// Where and with whom the courier meets for pickup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PickupDetails {
    #[validate(
        length(min = 1, message = "contact name is required"),
        custom(function = "not_blank")
    )]
    pub contact_name: String,
    #[validate(
        length(min = 1, message = "contact phone is required"),
        custom(function = "not_blank")
    )]
    pub contact_phone: String,
    #[validate(
        length(min = 1, message = "address line 1 is required"),
        custom(function = "not_blank")
    )]
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emirate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_window: Option<PickupWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Whitespace-only values count as missing, matching [`PickupDetails::has_contact`].
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

impl PickupDetails {
    /// The courier can only be dispatched with someone to call.
    pub fn has_contact(&self) -> bool {
        !self.contact_name.trim().is_empty() && !self.contact_phone.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChequeCollectionStatus {
    Draft,
    Submitted,
    Scheduled,
    Failed,
    Cancelled,
}

impl ChequeCollectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ChequeCollectionStatus::Draft => "DRAFT",
            ChequeCollectionStatus::Submitted => "SUBMITTED",
            ChequeCollectionStatus::Scheduled => "SCHEDULED",
            ChequeCollectionStatus::Failed => "FAILED",
            ChequeCollectionStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChequeRequesterRole {
    PropertyManager,
    Landlord,
    Agent,
}

/// A scheduled physical pickup of paper cheques for bank deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeCollectionRequest {
    pub id: ChequeRequestId,
    pub role: ChequeRequesterRole,
    pub requester_user_id: String,
    pub landlord_ids: Vec<String>,
    pub property_ids: Vec<String>,
    pub items: Vec<ChequeItem>,
    pub pickup: PickupDetails,
    pub status: ChequeCollectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChequeCollectionRequest {
    /// Fresh draft with no items and blank pickup contact.
    pub fn draft(
        id: ChequeRequestId,
        role: ChequeRequesterRole,
        requester_user_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            role,
            requester_user_id,
            landlord_ids: Vec::new(),
            property_ids: Vec::new(),
            items: Vec::new(),
            pickup: PickupDetails::default(),
            status: ChequeCollectionStatus::Draft,
            scheduled_at: None,
            bank_ref: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the items and recompute the landlord/property id sets from them.
    pub fn replace_items(&mut self, items: Vec<ChequeItem>) {
        self.landlord_ids = unique_in_order(items.iter().map(|item| item.landlord_id.as_str()));
        self.property_ids = unique_in_order(items.iter().map(|item| item.property_id.as_str()));
        self.items = items;
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|existing| existing == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
