use super::domain::PostingStatus;
use chrono::{DateTime, Utc};

/// Resolve a posting's status from its three date boundaries and "now".
///
/// Total over the whole timeline: the four statuses partition time with
/// half-open intervals, and an instant exactly on a boundary resolves to the
/// *later* state. Malformed postings fail soft: a missing application start or
/// end yields `Scheduled` so a bad row can never block the sweep, and a missing
/// evaluation end falls back to the application end.
pub fn resolve_posting_status(
    application_start: Option<DateTime<Utc>>,
    application_end: Option<DateTime<Utc>>,
    evaluation_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> PostingStatus {
    let (start, end) = match (application_start, application_end) {
        (Some(start), Some(end)) => (start, end),
        _ => return PostingStatus::Scheduled,
    };
    let evaluation_end = evaluation_end.unwrap_or(end);

    if now < start {
        PostingStatus::Scheduled
    } else if now < end {
        PostingStatus::InProgress
    } else if now < evaluation_end {
        PostingStatus::Closed
    } else {
        PostingStatus::EvaluationComplete
    }
}
