//! Seed data for the mock cheque collection API.

use chrono::{DateTime, TimeZone, Utc};

use super::domain::{
    ChequeCollectionRequest, ChequeCollectionStatus, ChequeImageMime, ChequeImageRef, ChequeItem,
    ChequeRequestId, ChequeRequesterRole, PickupDetails, PickupWindow,
};

/// First sequence number handed out after the seeded requests.
pub const NEXT_REQUEST_SEQUENCE: u64 = 1004;
/// First image sequence number handed out after the seeded images.
pub const NEXT_IMAGE_SEQUENCE: u64 = 5;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn image(sequence: u64, size_bytes: u64, hash: &str) -> ChequeImageRef {
    ChequeImageRef {
        id: format!("img-{sequence}"),
        filename: format!("cheque-{sequence}.jpg"),
        mime_type: ChequeImageMime::Jpeg,
        size_bytes,
        hash: hash.to_string(),
        url: Some("/placeholder.svg".to_string()),
    }
}

fn marina_pickup() -> PickupDetails {
    PickupDetails {
        contact_name: "Ahmed Al Mansoori".to_string(),
        contact_phone: "+971501234567".to_string(),
        address_line1: "Marina Heights Tower, Office 1204".to_string(),
        address_line2: Some("Dubai Marina".to_string()),
        city: Some("Dubai".to_string()),
        emirate: Some("Dubai".to_string()),
        preferred_window: Some(PickupWindow {
            start: "2025-01-16T09:00:00Z".to_string(),
            end: "2025-01-16T12:00:00Z".to_string(),
        }),
        special_instructions: Some("Call on arrival at reception".to_string()),
    }
}

pub fn seed_requests() -> Vec<ChequeCollectionRequest> {
    let mut scheduled = ChequeCollectionRequest::draft(
        ChequeRequestId::from_sequence(1001),
        ChequeRequesterRole::PropertyManager,
        "pm-001".to_string(),
        at(2025, 1, 15, 9, 0),
    );
    scheduled.replace_items(vec![
        ChequeItem {
            id: "item-1".to_string(),
            cheque_number: Some("000123".to_string()),
            amount_aed: Some(25000.0),
            issuer_name: Some("Sara Khan".to_string()),
            bank_name: Some("Emirates NBD".to_string()),
            date: Some("2025-02-01".to_string()),
            landlord_id: "LL-001".to_string(),
            property_id: "PROP-101".to_string(),
            images: vec![image(1, 245_812, "hash-8f2a1c")],
            notes: None,
        },
        ChequeItem {
            id: "item-2".to_string(),
            cheque_number: Some("000124".to_string()),
            amount_aed: Some(25000.0),
            issuer_name: Some("Sara Khan".to_string()),
            bank_name: Some("Emirates NBD".to_string()),
            date: Some("2025-05-01".to_string()),
            landlord_id: "LL-001".to_string(),
            property_id: "PROP-101".to_string(),
            images: vec![image(2, 198_044, "hash-51bd90")],
            notes: Some("Post-dated".to_string()),
        },
    ]);
    scheduled.pickup = marina_pickup();
    scheduled.status = ChequeCollectionStatus::Scheduled;
    scheduled.bank_ref = Some("BANK-CHQ-1736931600000-K4P2QX".to_string());
    scheduled.scheduled_at = Some(at(2025, 1, 16, 10, 30));
    scheduled.updated_at = at(2025, 1, 15, 9, 5);

    let mut draft = ChequeCollectionRequest::draft(
        ChequeRequestId::from_sequence(1002),
        ChequeRequesterRole::Landlord,
        "ll-002".to_string(),
        at(2025, 1, 18, 14, 20),
    );
    draft.replace_items(vec![ChequeItem {
        id: "item-3".to_string(),
        cheque_number: Some("884210".to_string()),
        amount_aed: Some(60000.0),
        issuer_name: Some("Omar Haddad".to_string()),
        bank_name: Some("ADCB".to_string()),
        date: Some("2025-03-01".to_string()),
        landlord_id: "LL-002".to_string(),
        property_id: "PROP-205".to_string(),
        images: vec![image(3, 310_552, "hash-c07e44")],
        notes: None,
    }]);

    let mut cancelled = ChequeCollectionRequest::draft(
        ChequeRequestId::from_sequence(1003),
        ChequeRequesterRole::Agent,
        "ag-003".to_string(),
        at(2025, 1, 10, 11, 45),
    );
    cancelled.replace_items(vec![ChequeItem {
        id: "item-4".to_string(),
        cheque_number: None,
        amount_aed: Some(12000.0),
        issuer_name: None,
        bank_name: Some("Mashreq".to_string()),
        date: None,
        landlord_id: "LL-003".to_string(),
        property_id: "PROP-330".to_string(),
        images: vec![image(4, 152_300, "hash-9a13fe")],
        notes: None,
    }]);
    cancelled.pickup = PickupDetails {
        contact_name: "Lina Farouk".to_string(),
        contact_phone: "+971552223344".to_string(),
        address_line1: "Al Reem Island, Sky Tower 3".to_string(),
        city: Some("Abu Dhabi".to_string()),
        emirate: Some("Abu Dhabi".to_string()),
        ..PickupDetails::default()
    };
    cancelled.status = ChequeCollectionStatus::Cancelled;
    cancelled.updated_at = at(2025, 1, 11, 8, 0);

    vec![scheduled, draft, cancelled]
}
