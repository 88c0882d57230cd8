use std::time::Duration;

use crate::workflows::recruiting::domain::{ApplicationId, ApplicationStatus, ResumeItemId};
use crate::workflows::recruiting::errors::RecruitingError;
use crate::workflows::recruiting::payload::ResumeAnswerInput;
use crate::workflows::recruiting::repository::RecruitingStore;

use super::common::{
    create_posting, date, evaluation_payload, harness, instant, posting_request, submission,
    Harness, RecordingEvaluator,
};

/// The forwarding queue hands submissions to a background worker; give it a
/// bounded moment to drain before asserting.
async fn wait_for_submissions(evaluator: &RecordingEvaluator, expected: usize) {
    for _ in 0..200 {
        if evaluator.submission_count() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "evaluator saw {} submissions, expected {expected}",
        evaluator.submission_count()
    );
}

#[tokio::test]
async fn submission_stores_the_application_before_evaluation() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    let view = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission succeeds");

    assert_eq!(view.status, "Awaiting Evaluation");
    assert_eq!(view.total_score, None);
    assert_eq!(view.submitted_at, instant(2025, 1, 15));

    let application = harness
        .store
        .fetch_application(view.application_id)
        .expect("store read")
        .expect("application exists");
    assert_eq!(application.resume_answers.len(), 3);
    assert_eq!(application.cover_letter_answers.len(), 1);
    assert!(application.resume_answers.iter().all(|a| a.score.is_none()));
}

#[tokio::test]
async fn repeat_submissions_reuse_the_applicant_identity() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    let first = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("first submission succeeds");
    let second = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("second submission succeeds");

    let first = harness
        .store
        .fetch_application(first.application_id)
        .expect("store read")
        .expect("application exists");
    let second = harness
        .store
        .fetch_application(second.application_id)
        .expect("store read")
        .expect("application exists");
    assert_eq!(first.applicant_id, second.applicant_id);
}

#[tokio::test]
async fn submission_rejects_unknown_postings_and_items() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    let err = harness
        .applications
        .submit(
            crate::workflows::recruiting::domain::JobPostingId(9999),
            submission(&posting, "jordan@example.com"),
        )
        .expect_err("unknown posting rejected");
    assert!(matches!(err, RecruitingError::NotFound { .. }));

    let mut request = submission(&posting, "jordan@example.com");
    request.resume_item_answers.push(ResumeAnswerInput {
        resume_item_id: ResumeItemId(9999),
        content: "orphaned".to_string(),
    });
    let err = harness
        .applications
        .submit(posting.id, request)
        .expect_err("unknown item rejected");
    assert!(matches!(err, RecruitingError::NotFound { .. }));
}

#[tokio::test]
async fn submissions_are_forwarded_to_the_evaluator() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission succeeds");

    wait_for_submissions(&harness.evaluator, 1).await;
    let forwarded = harness.evaluator.submissions.lock().expect("poisoned")[0].clone();
    assert_eq!(forwarded.applicant_email, "jordan@example.com");
    assert_eq!(forwarded.resume_item_answers.len(), 3);
    assert_eq!(forwarded.resume_item_answers[0].resume_item_name, "Work Experience");
    assert_eq!(
        forwarded.cover_letter_question_answers[0].question_content,
        "Why do you want to join?"
    );
}

#[tokio::test]
async fn evaluator_outage_never_fails_a_submission() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    *harness.evaluator.fail_submissions.lock().expect("poisoned") = true;

    let view = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission still succeeds");

    // The worker retries and gives up; the stored application is untouched.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(harness.evaluator.submission_count(), 0);
    let application = harness
        .store
        .fetch_application(view.application_id)
        .expect("store read")
        .expect("application exists");
    assert_eq!(application.status, ApplicationStatus::BeforeEvaluation);
}

#[tokio::test]
async fn decisions_update_status_and_comment() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    let view = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission succeeds");

    let decided = harness
        .applications
        .record_decision(
            view.application_id,
            Some("strong systems background".to_string()),
            "ACCEPTED",
        )
        .expect("decision recorded");
    assert_eq!(decided.status, "Accepted");
    assert_eq!(
        decided.evaluation_comment.as_deref(),
        Some("strong systems background")
    );
}

#[tokio::test]
async fn junk_decision_statuses_are_rejected_without_writes() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    let view = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission succeeds");

    let err = harness
        .applications
        .record_decision(view.application_id, Some("typo".to_string()), "APPROVED")
        .expect_err("unknown status rejected");
    assert!(matches!(err, RecruitingError::InvalidArgument(_)));

    let application = harness
        .store
        .fetch_application(view.application_id)
        .expect("store read")
        .expect("application exists");
    assert_eq!(application.status, ApplicationStatus::BeforeEvaluation);
    assert_eq!(application.evaluation_comment, None);

    let err = harness
        .applications
        .record_decision(ApplicationId(9999), None, "ACCEPTED")
        .expect_err("unknown application rejected");
    assert!(matches!(err, RecruitingError::NotFound { .. }));
}

#[tokio::test]
async fn details_expose_the_parsed_evaluation_snapshot() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    let view = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission succeeds");

    let details = harness
        .applications
        .details(view.application_id)
        .expect("details read");
    assert!(details.evaluation.is_none());
    assert_eq!(details.applicant.email, "jordan@example.com");

    harness
        .reconciler
        .ingest(evaluation_payload(&posting, "jordan@example.com"))
        .expect("ingestion succeeds");

    let details = harness
        .applications
        .details(view.application_id)
        .expect("details read");
    let evaluation = details.evaluation.expect("snapshot present");
    assert_eq!(evaluation.total_score, 13);
    assert!(evaluation.resume_scores.is_array());
    assert_eq!(
        evaluation.overall_analysis["recommendation"],
        serde_json::json!("PASS")
    );
}

async fn seed_statistics(harness: &Harness) {
    let posting = create_posting(harness).await;
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        harness
            .applications
            .submit(posting.id, submission(&posting, email))
            .expect("submission succeeds");
    }
    let first = harness
        .applications
        .list_for_posting(posting.id)
        .expect("list reads")[0]
        .application_id;
    harness
        .applications
        .record_decision(first, None, "ACCEPTED")
        .expect("decision recorded");

    // A posting that has not opened yet: reported per-posting, excluded from
    // the overall totals.
    let mut future = posting_request();
    future.title = "Platform Engineer".to_string();
    future.application_start_date = Some(date(2026, 1, 1));
    future.application_end_date = Some(date(2026, 1, 31));
    future.evaluation_end_date = Some(date(2026, 2, 15));
    let scheduled = harness
        .postings
        .create(future)
        .await
        .expect("posting creates");
    harness
        .applications
        .submit(scheduled.id, submission(&scheduled, "d@example.com"))
        .expect("submission succeeds");
}

#[tokio::test]
async fn statistics_count_decided_applications_per_posting() {
    let harness = harness(instant(2025, 1, 15));
    seed_statistics(&harness).await;

    let stats = harness.applications.statistics().expect("statistics read");

    assert_eq!(stats.postings.len(), 2);
    let open = &stats.postings[0];
    assert_eq!(open.total_applications, 3);
    assert_eq!(open.completed_evaluations, 1);
    assert_eq!(open.pending_evaluations, 2);
    assert_eq!(open.completion_rate, 33.33);

    let scheduled = &stats.postings[1];
    assert_eq!(scheduled.job_posting_title, "Platform Engineer");
    assert_eq!(scheduled.total_applications, 1);

    // Overall totals skip the scheduled posting.
    assert_eq!(stats.total_applications, 3);
    assert_eq!(stats.completed_evaluations, 1);
    assert_eq!(stats.pending_evaluations, 2);
    assert_eq!(stats.completion_rate, 33.33);
}

#[tokio::test]
async fn statistics_on_an_empty_store_are_all_zero() {
    let harness = harness(instant(2025, 1, 15));
    let stats = harness.applications.statistics().expect("statistics read");
    assert_eq!(stats.total_applications, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert!(stats.postings.is_empty());
}
