use super::domain::ResumeItemId;

/// One itemized resume evaluation entry paired with the item's configured
/// maximum, as fed to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredResumeItem {
    pub resume_item_id: ResumeItemId,
    pub max_score: u32,
    pub awarded: Option<i32>,
}

/// Total score for an application: the sum of awarded resume-item scores.
///
/// A missing awarded score contributes 0. A max score of 0 is a valid maximum,
/// not an exclusion signal, so its awarded score still counts; filtering items
/// out of evaluator-facing payloads is an upstream concern. Cover-letter
/// evaluations are advisory and never summed here.
pub fn aggregate_resume_score(items: &[ScoredResumeItem]) -> i64 {
    items
        .iter()
        .map(|item| i64::from(item.awarded.unwrap_or(0)))
        .sum()
}
