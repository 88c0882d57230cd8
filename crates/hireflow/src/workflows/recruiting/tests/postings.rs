use std::sync::Arc;
use std::time::Duration;

use crate::workflows::recruiting::domain::{JobPostingId, PostingStatus};
use crate::workflows::recruiting::errors::RecruitingError;
use crate::workflows::recruiting::memory::{FixedClock, InMemoryRecruitingStore};
use crate::workflows::recruiting::payload::CompanyRequest;
use crate::workflows::recruiting::postings::JobPostingService;
use crate::workflows::recruiting::repository::RecruitingStore;

use super::common::{create_posting, date, harness, instant, posting_request, RecordingEvaluator};

#[tokio::test]
async fn creation_resolves_status_and_trains_the_rubric() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    assert_eq!(posting.status, PostingStatus::InProgress);
    assert_ne!(posting.id, JobPostingId(0));
    // Every nested definition got a real id.
    assert!(posting.resume_items.iter().all(|item| item.id.0 != 0));
    assert!(posting.cover_letter_questions.iter().all(|q| q.id.0 != 0));

    let trainings = harness.evaluator.trainings.lock().expect("poisoned");
    assert_eq!(trainings.len(), 1);
    let export = &trainings[0];
    assert_eq!(export.job_posting_id, posting.id);
    // Identity and zero-max items never reach the rubric.
    assert_eq!(export.resume_criteria.len(), 2);
}

#[tokio::test]
async fn training_failure_fails_creation() {
    let store = Arc::new(InMemoryRecruitingStore::new());
    let clock = Arc::new(FixedClock(instant(2025, 1, 15)));
    let evaluator = Arc::new(RecordingEvaluator::failing_training());
    let postings = JobPostingService::new(
        store.clone(),
        evaluator,
        clock,
        Duration::from_secs(1),
    );
    postings
        .register_company(CompanyRequest {
            name: "Acme Robotics".to_string(),
            description: None,
        })
        .expect("company registers");

    let err = postings
        .create(posting_request())
        .await
        .expect_err("creation fails when training is rejected");
    assert!(matches!(err, RecruitingError::Evaluator(_)));

    // The inserted row is rolled back: a failed creation leaves nothing for
    // listings or the status sweep to see, and a retry cannot duplicate it.
    let postings = store.list_postings().expect("store lists");
    assert!(postings.is_empty());
}

#[tokio::test]
async fn creation_requires_a_registered_company() {
    let store = Arc::new(InMemoryRecruitingStore::new());
    let clock = Arc::new(FixedClock(instant(2025, 1, 15)));
    let evaluator = Arc::new(RecordingEvaluator::default());
    let postings = JobPostingService::new(store, evaluator, clock, Duration::from_secs(1));

    let err = postings
        .create(posting_request())
        .await
        .expect_err("creation fails without a company");
    assert!(matches!(err, RecruitingError::NotFound { .. }));
}

#[tokio::test]
async fn second_company_registration_is_rejected() {
    let harness = harness(instant(2025, 1, 15));
    let err = harness
        .postings
        .register_company(CompanyRequest {
            name: "Another Co".to_string(),
            description: None,
        })
        .expect_err("second registration rejected");
    assert!(matches!(err, RecruitingError::InvalidArgument(_)));

    let company = harness.postings.company().expect("company reads");
    assert_eq!(company.name, "Acme Robotics");
}

#[tokio::test]
async fn update_replaces_definitions_and_recomputes_status() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    assert_eq!(posting.status, PostingStatus::InProgress);

    let mut request = posting_request();
    request.title = "Senior Backend Engineer".to_string();
    request.application_start_date = Some(date(2025, 2, 1));
    request.application_end_date = Some(date(2025, 2, 28));
    request.evaluation_end_date = Some(date(2025, 3, 15));
    request.resume_items.truncate(1);

    let updated = harness
        .postings
        .update(posting.id, request)
        .expect("update succeeds");

    assert_eq!(updated.title, "Senior Backend Engineer");
    // The new window has not opened at the fixed clock.
    assert_eq!(updated.status, PostingStatus::Scheduled);
    assert_eq!(updated.resume_items.len(), 1);
    // Replacement definitions are allocated fresh ids.
    assert_ne!(updated.resume_items[0].id.0, 0);
}

#[tokio::test]
async fn criteria_reads_back_the_rubric_for_a_posting() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    let export = harness.postings.criteria(posting.id).expect("criteria read");
    assert_eq!(export.job_posting_title, "Backend Engineer");
    assert_eq!(export.passing_score, 10);

    let err = harness
        .postings
        .criteria(JobPostingId(9999))
        .expect_err("unknown posting rejected");
    assert!(matches!(err, RecruitingError::NotFound { .. }));
}
