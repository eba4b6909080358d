use chrono::{DateTime, Days, Utc};

use super::domain::{
    InstallmentStatus, LoanSchedule, LoanTimeline, TimelineEvent, TimelineEventType,
};
use super::schedule::{generate_schedule, loan_start, ScheduleError, LOAN_PRINCIPAL};

/// Approval milestones, expressed as days before the first due date.
const MILESTONES: [(TimelineEventType, &str, &str, u64); 4] = [
    (
        TimelineEventType::Application,
        "Application Submitted",
        "Loan application submitted for processing",
        45,
    ),
    (
        TimelineEventType::Preapproved,
        "Pre-approved",
        "Initial approval based on documents",
        41,
    ),
    (
        TimelineEventType::Approved,
        "Loan Approved",
        "Final approval completed",
        36,
    ),
    (
        TimelineEventType::Disbursed,
        "Amount Disbursed",
        "Loan amount disbursed to landlord",
        31,
    ),
];

pub fn generate_timeline(
    application_id: &str,
    now: DateTime<Utc>,
) -> Result<LoanTimeline, ScheduleError> {
    let start = loan_start(now)?;
    let schedule = generate_schedule(application_id, now)?;

    let mut events = Vec::with_capacity(MILESTONES.len() + schedule.installments.len());
    for (position, (kind, label, note, days_before)) in MILESTONES.into_iter().enumerate() {
        let date = start
            .checked_sub_days(Days::new(days_before))
            .ok_or(ScheduleError::DateOutOfRange { index: 0 })?;
        if date > now {
            break;
        }

        let disbursed = kind == TimelineEventType::Disbursed;
        events.push(TimelineEvent {
            id: format!("evt-{}", position + 1),
            kind,
            label: label.to_string(),
            date,
            note: Some(note.to_string()),
            amount: disbursed.then_some(LOAN_PRINCIPAL),
            reference: disbursed.then(|| format!("TXN-{application_id}-001")),
            installment_number: None,
            status: None,
        });
    }

    events.extend(installment_events(&schedule, events.len()));

    Ok(LoanTimeline {
        application_id: application_id.to_string(),
        events,
    })
}

fn installment_events(
    schedule: &LoanSchedule,
    offset: usize,
) -> impl Iterator<Item = TimelineEvent> + '_ {
    schedule
        .installments
        .iter()
        .enumerate()
        .map(move |(index, installment)| {
            let number = index as u32 + 1;
            let note = match installment.status {
                InstallmentStatus::Paid => "Payment received",
                InstallmentStatus::Pending => "Upcoming payment",
                InstallmentStatus::Overdue => "Payment overdue",
            };
            TimelineEvent {
                id: format!("evt-{}", offset + index + 1),
                kind: TimelineEventType::Installment,
                label: format!("Installment {number}"),
                date: installment.paid_at.unwrap_or(installment.due_date),
                note: Some(note.to_string()),
                amount: Some(installment.amount),
                reference: Some(installment.id.clone()),
                installment_number: Some(number),
                status: Some(installment.status),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn milestones_precede_installments() {
        let now = Utc
            .with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
            .single()
            .expect("valid");
        let timeline = generate_timeline("APP-1001", now).expect("timeline");

        let kinds: Vec<TimelineEventType> = timeline.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            &kinds[..4],
            &[
                TimelineEventType::Application,
                TimelineEventType::Preapproved,
                TimelineEventType::Approved,
                TimelineEventType::Disbursed,
            ]
        );
        assert_eq!(timeline.events.len(), 10);
        assert_eq!(timeline.events[3].amount, Some(12_000));
        assert_eq!(timeline.events[5].status, Some(InstallmentStatus::Overdue));
        assert_eq!(timeline.events[9].id, "evt-10");
        assert!(timeline
            .events
            .windows(2)
            .take(4)
            .all(|pair| pair[0].date <= pair[1].date));
    }

    #[test]
    fn future_milestones_are_omitted() {
        let now = Utc
            .with_ymd_and_hms(2025, 2, 5, 9, 0, 0)
            .single()
            .expect("valid");
        let timeline = generate_timeline("APP-3003", now).expect("timeline");
        let milestones = timeline
            .events
            .iter()
            .filter(|e| e.kind != TimelineEventType::Installment)
            .count();
        assert_eq!(milestones, 2);
    }
}
