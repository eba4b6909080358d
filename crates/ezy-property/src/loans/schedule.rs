//! Deterministic security-deposit loan schedule.
//!
//! The loan is 10% of a 120k annual rent, repaid over six monthly installments
//! starting 2025-03-15. Installment status is derived from `now`, so callers
//! pass the clock in explicitly.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use super::domain::{Installment, InstallmentStatus, LoanSchedule};

pub const DEFAULT_APPLICATION_ID: &str = "APP-1001";
pub const LOAN_PRINCIPAL: u64 = 12_000;
pub const TERM_MONTHS: u32 = 6;

/// Applications containing this marker demo a missed second payment.
const OVERDUE_DEMO_MARKER: &str = "1001";

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("installment {index} due date is out of range")]
    DateOutOfRange { index: u32 },
}

/// First due date: 2025-03-15 at the current time of day.
pub fn loan_start(now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    NaiveDate::from_ymd_opt(2025, 3, 15)
        .map(|date| date.and_time(now.time()).and_utc())
        .ok_or(ScheduleError::DateOutOfRange { index: 0 })
}

pub fn generate_schedule(
    application_id: &str,
    now: DateTime<Utc>,
) -> Result<LoanSchedule, ScheduleError> {
    let start = loan_start(now)?;
    let amount = (LOAN_PRINCIPAL as f64 / TERM_MONTHS as f64).round() as u64;
    let demo_overdue = application_id.contains(OVERDUE_DEMO_MARKER);

    let installments = (0..TERM_MONTHS)
        .map(|index| {
            let due_date = start
                .checked_add_months(Months::new(index))
                .ok_or(ScheduleError::DateOutOfRange { index })?;
            let (status, paid_after_days) = installment_state(index, due_date, now, demo_overdue);
            let paid_at = match paid_after_days {
                Some(days) => Some(
                    due_date
                        .checked_add_days(Days::new(days))
                        .ok_or(ScheduleError::DateOutOfRange { index })?,
                ),
                None => None,
            };

            Ok(Installment {
                id: format!("{application_id}-INST-{}", index + 1),
                due_date,
                amount,
                status,
                paid_at,
            })
        })
        .collect::<Result<Vec<_>, ScheduleError>>()?;

    Ok(LoanSchedule::from_installments(
        application_id.to_string(),
        installments,
    ))
}

/// Status plus, for paid installments, how many days after the due date the payment landed.
fn installment_state(
    index: u32,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
    demo_overdue: bool,
) -> (InstallmentStatus, Option<u64>) {
    if due_date >= now {
        return (InstallmentStatus::Pending, None);
    }

    match index {
        0 => (InstallmentStatus::Paid, Some(1)),
        1 if demo_overdue => (InstallmentStatus::Overdue, None),
        1 => (InstallmentStatus::Paid, Some(3)),
        _ => (InstallmentStatus::Overdue, None),
    }
}
