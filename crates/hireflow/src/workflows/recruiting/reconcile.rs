//! Reconciliation of evaluator-pushed results against in-flight applications.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::domain::{Application, ApplicationId, ApplicationStatus, JobPosting};
use super::errors::RecruitingError;
use super::payload::{EvaluationPayload, ResumeScoreSnapshot};
use super::repository::{EvaluationResultRecord, RecruitingStore};
use super::scheduler::Clock;
use super::scoring::{aggregate_resume_score, ScoredResumeItem};

/// Maximum assumed for a resume item the posting no longer defines. The
/// evaluator's entry still counts; we only lose the configured ceiling.
const FALLBACK_MAX_SCORE: u32 = 10;

/// Orchestrates evaluation ingestion: locates the target application, scores
/// answers in place, aggregates the total, and commits the application row and
/// the replacement evaluation result as one unit.
///
/// Concurrent ingestions for the same application are serialized through a
/// per-application lock registry; ingestions for different applications do not
/// contend.
pub struct EvaluationReconciler<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    locks: Mutex<HashMap<ApplicationId, Arc<Mutex<()>>>>,
}

impl<S, C> EvaluationReconciler<S, C>
where
    S: RecruitingStore + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Primary ingestion entry point, used by the evaluator push.
    ///
    /// Resolution order: an explicit application id is tried first; on miss or
    /// absence the applicant is resolved by email and their most recently
    /// created application is taken. Re-ingestion for an application replaces
    /// its evaluation result wholesale, so at-least-once delivery is safe.
    pub fn ingest(
        &self,
        payload: EvaluationPayload,
    ) -> Result<EvaluationResultRecord, RecruitingError> {
        let application = self.locate(&payload)?;
        self.reconcile(application, payload)
    }

    /// Administrative entry point for callers that know the application id.
    /// Never falls back to email resolution: the id wins even when the payload
    /// email disagrees, and a stale id is a plain NotFound.
    pub fn ingest_by_application_id(
        &self,
        payload: EvaluationPayload,
    ) -> Result<EvaluationResultRecord, RecruitingError> {
        let id = payload.application_id.ok_or_else(|| {
            RecruitingError::InvalidArgument("application_id is required".to_string())
        })?;
        let application = self
            .store
            .fetch_application(id)?
            .ok_or_else(|| RecruitingError::not_found("application", id))?;
        self.reconcile(application, payload)
    }

    fn locate(&self, payload: &EvaluationPayload) -> Result<Application, RecruitingError> {
        if let Some(id) = payload.application_id {
            if let Some(application) = self.store.fetch_application(id)? {
                return Ok(application);
            }
            warn!(
                application_id = %id,
                applicant_email = %payload.applicant_email,
                "evaluation carried a stale application id, falling back to email resolution"
            );
        }

        let applicant = self
            .store
            .find_applicant_by_email(&payload.applicant_email)?
            .ok_or_else(|| {
                RecruitingError::not_found("applicant", payload.applicant_email.clone())
            })?;

        // Heuristic: at most one of an applicant's applications is being
        // evaluated at a time, so the newest one is the target.
        self.store
            .applications_for_applicant(applicant.id)?
            .pop()
            .ok_or_else(|| RecruitingError::not_found("application for applicant", applicant.id))
    }

    fn reconcile(
        &self,
        located: Application,
        payload: EvaluationPayload,
    ) -> Result<EvaluationResultRecord, RecruitingError> {
        let lock = self.lock_for(located.id);
        let _guard = lock.lock().expect("application lock poisoned");

        // Re-read under the lock so racing ingestions see each other's commit.
        let mut application = self
            .store
            .fetch_application(located.id)?
            .ok_or_else(|| RecruitingError::not_found("application", located.id))?;

        let posting = self
            .store
            .fetch_posting(application.job_posting_id)?
            .ok_or_else(|| {
                RecruitingError::not_found("job posting", application.job_posting_id)
            })?;

        // First result landing moves the application under evaluation; doing
        // it again on re-ingestion is a no-op in effect.
        application.status = ApplicationStatus::InProgress;

        let snapshots = score_answers(&mut application, &posting, &payload);
        let scored: Vec<ScoredResumeItem> = snapshots
            .iter()
            .map(|snapshot| ScoredResumeItem {
                resume_item_id: snapshot.resume_item_id,
                max_score: snapshot.max_score,
                awarded: snapshot.score,
            })
            .collect();
        let total_score = aggregate_resume_score(&scored);
        application.total_score = Some(total_score);

        // Serialize every snapshot before touching the store, so a bad nested
        // structure aborts with nothing persisted.
        let resume_scores = serde_json::to_string(&snapshots)?;
        let cover_letter_scores = serde_json::to_string(&payload.cover_letter_evaluations)?;
        let overall_analysis = serde_json::to_string(&payload.overall_analysis)?;

        let record = EvaluationResultRecord {
            application_id: application.id,
            applicant_name: payload.applicant_name,
            applicant_email: payload.applicant_email,
            job_posting_id: payload.job_posting_id,
            total_score,
            resume_scores,
            cover_letter_scores,
            overall_analysis,
            completed_at: self.clock.now(),
        };

        self.store
            .commit_evaluation(application.clone(), record.clone())?;

        info!(
            application_id = %application.id,
            job_posting_id = %application.job_posting_id,
            total_score,
            "evaluation result reconciled"
        );

        Ok(record)
    }

    fn lock_for(&self, id: ApplicationId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry poisoned");
        // Entries held only by the registry belong to finished reconciliations;
        // dropping them keeps the map bounded by in-flight work, not by every
        // application ever evaluated.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(id).or_default().clone()
    }

    #[cfg(test)]
    pub(super) fn tracked_lock_count(&self) -> usize {
        self.locks.lock().expect("lock registry poisoned").len()
    }
}

/// Write each itemized score into the matching stored answer (first match wins
/// when duplicates exist) and build the enriched snapshot rows.
fn score_answers(
    application: &mut Application,
    posting: &JobPosting,
    payload: &EvaluationPayload,
) -> Vec<ResumeScoreSnapshot> {
    payload
        .resume_evaluations
        .iter()
        .map(|entry| {
            let max_score = posting
                .resume_item(entry.resume_item_id)
                .map(|item| item.max_score)
                .unwrap_or(FALLBACK_MAX_SCORE);

            match application.resume_answer_mut(entry.resume_item_id) {
                Some(answer) => answer.score = entry.score,
                None => warn!(
                    application_id = %application.id,
                    resume_item_id = %entry.resume_item_id,
                    "evaluation entry has no stored answer, keeping it in the snapshot only"
                ),
            }

            ResumeScoreSnapshot {
                resume_item_id: entry.resume_item_id,
                resume_item_name: entry.resume_item_name.clone(),
                resume_content: entry.resume_content.clone(),
                score: entry.score,
                max_score,
            }
        })
        .collect()
}
