use crate::workflows::recruiting::domain::JobPostingId;
use crate::workflows::recruiting::repository::{RecruitingStore, StoreError};

use super::common::{create_posting, harness, instant, submission};

#[tokio::test]
async fn delete_posting_removes_the_row() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;

    harness
        .store
        .delete_posting(posting.id)
        .expect("delete succeeds");

    assert!(harness
        .store
        .fetch_posting(posting.id)
        .expect("store reads")
        .is_none());
    assert!(harness.store.list_postings().expect("store lists").is_empty());
}

#[tokio::test]
async fn delete_posting_rejects_unknown_ids() {
    let harness = harness(instant(2025, 1, 15));
    let err = harness
        .store
        .delete_posting(JobPostingId(42))
        .expect_err("unknown posting rejected");
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn email_and_posting_lookup_returns_the_newest_match() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    let other = create_posting(&harness).await;

    let first = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("first submission");
    let second = harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("second submission");
    harness
        .applications
        .submit(other.id, submission(&other, "jordan@example.com"))
        .expect("submission to the other posting");

    let found = harness
        .store
        .application_for_email_and_posting("jordan@example.com", posting.id)
        .expect("store reads")
        .expect("a match exists");

    // Scoped to the posting, newest application wins.
    assert_eq!(found.id, second.application_id);
    assert_ne!(found.id, first.application_id);
}

#[tokio::test]
async fn email_and_posting_lookup_misses_cleanly() {
    let harness = harness(instant(2025, 1, 15));
    let posting = create_posting(&harness).await;
    harness
        .applications
        .submit(posting.id, submission(&posting, "jordan@example.com"))
        .expect("submission");

    assert!(harness
        .store
        .application_for_email_and_posting("nobody@example.com", posting.id)
        .expect("store reads")
        .is_none());
    assert!(harness
        .store
        .application_for_email_and_posting("jordan@example.com", JobPostingId(42))
        .expect("store reads")
        .is_none());
}
