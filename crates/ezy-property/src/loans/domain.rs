use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Paid,
    Pending,
    Overdue,
}

/// One scheduled partial payment within a repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    pub due_date: DateTime<Utc>,
    pub amount: u64,
    pub status: InstallmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Repayment projection for a single loan application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSchedule {
    pub application_id: String,
    pub total_amount: u64,
    pub total_paid: u64,
    pub remaining_balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<DateTime<Utc>>,
    pub overdue_flag: bool,
    pub installments: Vec<Installment>,
}

impl LoanSchedule {
    /// Derive the aggregate fields from an ordered installment list.
    pub fn from_installments(application_id: String, installments: Vec<Installment>) -> Self {
        let total_amount = installments.iter().map(|it| it.amount).sum::<u64>();
        let total_paid = installments
            .iter()
            .filter(|it| it.status == InstallmentStatus::Paid)
            .map(|it| it.amount)
            .sum::<u64>();
        let next_due_date = installments
            .iter()
            .find(|it| it.status != InstallmentStatus::Paid)
            .map(|it| it.due_date);
        let overdue_flag = installments
            .iter()
            .any(|it| it.status == InstallmentStatus::Overdue);

        Self {
            application_id,
            total_amount,
            total_paid,
            remaining_balance: total_amount.saturating_sub(total_paid),
            next_due_date,
            overdue_flag,
            installments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEventType {
    Application,
    Preapproved,
    Approved,
    Disbursed,
    Installment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TimelineEventType,
    pub label: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InstallmentStatus>,
}

/// Ordered event log for a loan application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTimeline {
    pub application_id: String,
    pub events: Vec<TimelineEvent>,
}
