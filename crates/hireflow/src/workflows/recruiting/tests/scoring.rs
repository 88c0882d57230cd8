use crate::workflows::recruiting::domain::ResumeItemId;
use crate::workflows::recruiting::scoring::{aggregate_resume_score, ScoredResumeItem};

fn item(id: u64, max_score: u32, awarded: Option<i32>) -> ScoredResumeItem {
    ScoredResumeItem {
        resume_item_id: ResumeItemId(id),
        max_score,
        awarded,
    }
}

#[test]
fn empty_evaluation_totals_zero() {
    assert_eq!(aggregate_resume_score(&[]), 0);
}

#[test]
fn total_is_the_sum_of_awarded_scores() {
    let items = [item(1, 10, Some(8)), item(2, 5, Some(5))];
    assert_eq!(aggregate_resume_score(&items), 13);
}

#[test]
fn missing_awarded_score_counts_as_zero() {
    let items = [item(1, 10, Some(7)), item(2, 5, None)];
    assert_eq!(aggregate_resume_score(&items), 7);
}

#[test]
fn zero_maximum_does_not_exclude_the_item() {
    // An item with max 0 is a real rubric entry; any awarded score still sums.
    let items = [item(1, 10, Some(7)), item(2, 0, Some(0))];
    assert_eq!(aggregate_resume_score(&items), 7);

    let items = [item(1, 10, Some(7)), item(2, 0, Some(3))];
    assert_eq!(aggregate_resume_score(&items), 10);
}

#[test]
fn awarded_above_maximum_is_summed_as_given() {
    // Clamping is the evaluator's job; aggregation trusts the entries.
    let items = [item(1, 5, Some(9))];
    assert_eq!(aggregate_resume_score(&items), 9);
}
