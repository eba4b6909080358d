use crate::infra::parse_timestamp;
use chrono::{DateTime, Utc};
use clap::Args;
use ezy_property::cheques::{
    ChequeCollectionProvider, ChequeCollectionService, ChequeItem, ChequeRequesterRole,
    CreateChequeRequest, HttpChequeCollectionProvider, ImageUpload, InMemoryChequeRepository,
    MockChequeCollectionProvider, PickupDetails, PickupWindow, SubmissionContext,
    UpdateChequeRequest,
};
use ezy_property::error::AppError;
use ezy_property::loans::{
    generate_schedule, generate_timeline, LoanSchedule, LoanTimeline, DEFAULT_APPLICATION_ID,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoanProjection {
    Schedule,
    Timeline,
}

#[derive(Args, Debug)]
pub(crate) struct LoanProjectionArgs {
    /// Loan application identifier
    #[arg(long, default_value = DEFAULT_APPLICATION_ID)]
    pub(crate) application_id: String,
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the raw JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Requester user id for the demo draft
    #[arg(long, default_value = "pm-001")]
    pub(crate) user_id: String,
    /// Route the submission through the unimplemented bank client to show the failure path
    #[arg(long)]
    pub(crate) bank_failure: bool,
}

pub(crate) fn run_loan_projection(
    args: LoanProjectionArgs,
    projection: LoanProjection,
) -> Result<(), AppError> {
    let LoanProjectionArgs {
        application_id,
        now,
        json,
    } = args;
    let now = now.unwrap_or_else(Utc::now);

    match projection {
        LoanProjection::Schedule => {
            let schedule = generate_schedule(&application_id, now)?;
            if json {
                print_json(&schedule);
            } else {
                render_schedule(&schedule, now);
            }
        }
        LoanProjection::Timeline => {
            let timeline = generate_timeline(&application_id, now)?;
            if json {
                print_json(&timeline);
            } else {
                render_timeline(&timeline, now);
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("JSON payload unavailable: {}", err),
    }
}

pub(crate) fn render_schedule(schedule: &LoanSchedule, now: DateTime<Utc>) {
    println!("Loan schedule for {}", schedule.application_id);
    println!("Evaluated at {}", now.format("%Y-%m-%d %H:%M UTC"));
    println!(
        "- Total {} AED | paid {} AED | remaining {} AED",
        schedule.total_amount, schedule.total_paid, schedule.remaining_balance
    );
    match schedule.next_due_date {
        Some(next) => println!("- Next due {}", next.format("%Y-%m-%d")),
        None => println!("- Fully repaid"),
    }
    if schedule.overdue_flag {
        println!("- Attention: at least one installment is overdue");
    }
    println!("Installments:");
    for installment in &schedule.installments {
        let paid = installment
            .paid_at
            .map(|at| format!(" (paid {})", at.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "  - {} due {} | {} AED | {:?}{}",
            installment.id,
            installment.due_date.format("%Y-%m-%d"),
            installment.amount,
            installment.status,
            paid
        );
    }
}

pub(crate) fn render_timeline(timeline: &LoanTimeline, now: DateTime<Utc>) {
    println!("Loan timeline for {}", timeline.application_id);
    println!("Evaluated at {}", now.format("%Y-%m-%d %H:%M UTC"));
    for event in &timeline.events {
        let detail = match (&event.amount, &event.reference) {
            (Some(amount), Some(reference)) => format!(" | {} AED ({})", amount, reference),
            (Some(amount), None) => format!(" | {} AED", amount),
            _ => String::new(),
        };
        println!(
            "  - {} {}{}",
            event.date.format("%Y-%m-%d"),
            event.label,
            detail
        );
        if let Some(note) = &event.note {
            println!("      {}", note);
        }
    }
}

fn demo_items() -> Vec<ChequeItem> {
    vec![
        ChequeItem {
            id: "item-1".to_string(),
            cheque_number: Some("000731".to_string()),
            amount_aed: Some(45_000.0),
            issuer_name: Some("Omar Haddad".to_string()),
            bank_name: Some("Emirates NBD".to_string()),
            date: Some("2025-07-01".to_string()),
            landlord_id: "LL-001".to_string(),
            property_id: "PROP-101".to_string(),
            images: Vec::new(),
            notes: None,
        },
        ChequeItem {
            id: "item-2".to_string(),
            cheque_number: Some("000732".to_string()),
            amount_aed: Some(45_000.0),
            issuer_name: Some("Omar Haddad".to_string()),
            bank_name: Some("Emirates NBD".to_string()),
            date: Some("2026-01-01".to_string()),
            landlord_id: "LL-001".to_string(),
            property_id: "PROP-102".to_string(),
            images: Vec::new(),
            notes: Some("Post-dated".to_string()),
        },
    ]
}

fn demo_pickup() -> PickupDetails {
    PickupDetails {
        contact_name: "Aisha Karim".to_string(),
        contact_phone: "+971501234567".to_string(),
        address_line1: "Dubai Marina, Marina Gate 1".to_string(),
        address_line2: Some("Tower 2, Unit 1405".to_string()),
        city: Some("Dubai".to_string()),
        emirate: Some("Dubai".to_string()),
        preferred_window: Some(PickupWindow {
            start: "10:00".to_string(),
            end: "12:00".to_string(),
        }),
        special_instructions: Some("Call on arrival".to_string()),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        user_id,
        bank_failure,
    } = args;

    let provider: Arc<dyn ChequeCollectionProvider> = if bank_failure {
        Arc::new(HttpChequeCollectionProvider::new(
            "https://bank.invalid",
            "demo-key",
        ))
    } else {
        Arc::new(MockChequeCollectionProvider)
    };
    let repository = Arc::new(InMemoryChequeRepository::seeded());
    let service = ChequeCollectionService::new(repository, provider);

    println!("Cheque collection demo");
    let draft = match service.create(CreateChequeRequest {
        role: ChequeRequesterRole::PropertyManager,
        requester_user_id: user_id,
    }) {
        Ok(draft) => draft,
        Err(err) => {
            println!("  Draft rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Created {} for {} -> status {}",
        draft.id,
        draft.requester_user_id,
        draft.status.label()
    );

    let mut items = demo_items();
    match service.upload(&draft.id, ImageUpload::default()) {
        Ok(image) => {
            println!(
                "- Uploaded {} ({} bytes, {})",
                image.id,
                image.size_bytes,
                image.mime_type.essence()
            );
            items[0].images.push(image);
        }
        Err(err) => println!("  Image upload failed: {}", err),
    }

    let updated = match service.update(
        &draft.id,
        UpdateChequeRequest {
            items: Some(items),
            pickup: Some(demo_pickup()),
            notes: Some("Collect both cheques together".to_string()),
        },
    ) {
        Ok(updated) => updated,
        Err(err) => {
            println!("  Update rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Attached {} cheques | landlords {:?} | properties {:?}",
        updated.items.len(),
        updated.landlord_ids,
        updated.property_ids
    );

    let ctx = SubmissionContext::generated();
    match service.submit(&draft.id, &ctx).await {
        Ok(outcome) => println!(
            "- Submitted -> {} | bank ref {} | pickup {}",
            outcome.request.status.label(),
            outcome.bank_ref,
            outcome.scheduled_at.format("%Y-%m-%d %H:%M UTC")
        ),
        Err(err) => {
            println!("- Submission failed: {}", err);
            if let Ok(request) = service.get(&draft.id) {
                println!("  Request status now {}", request.status.label());
            }
        }
    }

    match service.cancel(&draft.id) {
        Ok(cancelled) => println!("- Cancelled -> {}", cancelled.status.label()),
        Err(err) => println!("  Cancel failed: {}", err),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_runs_with_both_providers() {
        run_demo(DemoArgs {
            user_id: "pm-001".to_string(),
            bank_failure: false,
        })
        .await
        .expect("mock demo");
        run_demo(DemoArgs {
            user_id: "pm-001".to_string(),
            bank_failure: true,
        })
        .await
        .expect("failure demo");
    }

    #[test]
    fn loan_projection_accepts_explicit_clock() {
        let args = LoanProjectionArgs {
            application_id: "APP-1001".to_string(),
            now: Some(parse_timestamp("2025-05-01T09:00:00Z").expect("timestamp")),
            json: false,
        };
        run_loan_projection(args, LoanProjection::Timeline).expect("timeline renders");
    }
}
