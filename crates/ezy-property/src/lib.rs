//! Property-management back office glue: the cheque collection mock API and
//! the security-deposit loan functions.

pub mod cheques;
pub mod config;
pub mod error;
pub mod loans;
pub mod telemetry;
