//! Recruiting workflow core.
//!
//! The [`workflows::recruiting`] module carries the domain: job postings with
//! time-driven statuses, applicant submissions, and reconciliation of evaluation
//! results pushed back asynchronously by an external evaluator.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
