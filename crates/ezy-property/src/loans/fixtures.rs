//! Canned loan data served while authentication is disabled.

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    Installment, InstallmentStatus, LoanSchedule, LoanTimeline, TimelineEvent, TimelineEventType,
};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn installment(
    id: &str,
    due: DateTime<Utc>,
    status: InstallmentStatus,
    paid_at: Option<DateTime<Utc>>,
) -> Installment {
    Installment {
        id: id.to_string(),
        due_date: due,
        amount: 10_000,
        status,
        paid_at,
    }
}

pub fn mock_schedule(application_id: &str) -> LoanSchedule {
    LoanSchedule {
        application_id: application_id.to_string(),
        total_amount: 120_000,
        total_paid: 40_000,
        remaining_balance: 80_000,
        next_due_date: Some(day(2024, 2, 15)),
        overdue_flag: false,
        installments: vec![
            installment(
                "inst-1",
                day(2024, 1, 15),
                InstallmentStatus::Paid,
                Some(day(2024, 1, 14)),
            ),
            installment("inst-2", day(2024, 2, 15), InstallmentStatus::Pending, None),
            installment("inst-3", day(2024, 3, 15), InstallmentStatus::Pending, None),
        ],
    }
}

fn milestone(
    id: &str,
    kind: TimelineEventType,
    label: &str,
    date: DateTime<Utc>,
    note: &str,
) -> TimelineEvent {
    TimelineEvent {
        id: id.to_string(),
        kind,
        label: label.to_string(),
        date,
        note: Some(note.to_string()),
        amount: None,
        reference: None,
        installment_number: None,
        status: None,
    }
}

pub fn mock_timeline(application_id: &str) -> LoanTimeline {
    let mut disbursed = milestone(
        "evt-4",
        TimelineEventType::Disbursed,
        "Amount Disbursed",
        day(2023, 12, 15),
        "Loan amount disbursed to landlord",
    );
    disbursed.amount = Some(120_000);
    disbursed.reference = Some("TXN-120000-001".to_string());

    LoanTimeline {
        application_id: application_id.to_string(),
        events: vec![
            milestone(
                "evt-1",
                TimelineEventType::Application,
                "Application Submitted",
                day(2023, 12, 1),
                "Loan application submitted for processing",
            ),
            milestone(
                "evt-2",
                TimelineEventType::Preapproved,
                "Pre-approved",
                day(2023, 12, 5),
                "Initial approval based on documents",
            ),
            milestone(
                "evt-3",
                TimelineEventType::Approved,
                "Loan Approved",
                day(2023, 12, 10),
                "Final approval completed",
            ),
            disbursed,
        ],
    }
}
