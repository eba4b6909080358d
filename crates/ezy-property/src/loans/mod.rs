//! Security-deposit loan projections: the schedule/timeline generators, the
//! functions that expose them, and the provider the web client reads through.

pub mod domain;
pub mod fixtures;
pub mod function;
pub mod provider;
pub mod router;
pub mod schedule;
pub mod timeline;

pub use domain::{
    Installment, InstallmentStatus, LoanSchedule, LoanTimeline, TimelineEvent, TimelineEventType,
};
pub use function::{
    loan_function_router, loan_function_router_with_clock, Clock, SCHEDULE_FUNCTION_PATH,
    TIMELINE_FUNCTION_PATH,
};
pub use provider::{
    provider_from_config, FixtureLoanProvider, LoanProvider, LoanProviderError,
    RemoteLoanProvider,
};
pub use router::loan_router;
pub use schedule::{generate_schedule, ScheduleError, DEFAULT_APPLICATION_ID};
pub use timeline::generate_timeline;
