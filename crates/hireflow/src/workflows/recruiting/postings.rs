//! Posting management: creation with evaluator training, updates, and reads.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::criteria::build_criteria_export;
use super::dispatch::{train_with_timeout, EvaluatorClient};
use super::domain::{
    Company, CoverLetterQuestion, CoverLetterQuestionId, GradeCriterion, JobPosting, JobPostingId,
    QuestionCriterion, ResumeItem, ResumeItemId, ScoreWeights,
};
use super::errors::RecruitingError;
use super::payload::{CompanyRequest, CriteriaExport, JobPostingRequest};
use super::repository::RecruitingStore;
use super::scheduler::Clock;
use super::status::resolve_posting_status;

/// Posting lifecycle operations. Creation is the one place this system calls
/// the evaluator synchronously: the rubric must be acknowledged before the
/// posting exists, so training failures (including timeouts) fail creation.
pub struct JobPostingService<S, E, C> {
    store: Arc<S>,
    evaluator: Arc<E>,
    clock: Arc<C>,
    train_timeout: Duration,
}

impl<S, E, C> JobPostingService<S, E, C>
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, evaluator: Arc<E>, clock: Arc<C>, train_timeout: Duration) -> Self {
        Self {
            store,
            evaluator,
            clock,
            train_timeout,
        }
    }

    /// Register the single company. A second registration is rejected.
    pub fn register_company(&self, request: CompanyRequest) -> Result<Company, RecruitingError> {
        use super::repository::StoreError;
        match self
            .store
            .register_company(request.name, request.description)
        {
            Ok(company) => Ok(company),
            Err(StoreError::Conflict) => Err(RecruitingError::InvalidArgument(
                "a company is already registered".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    pub fn company(&self) -> Result<Company, RecruitingError> {
        self.store
            .fetch_company()?
            .ok_or_else(|| RecruitingError::not_found("company", "none registered"))
    }

    /// Create a posting. The initial status is resolved from the dates, never
    /// taken from the request, and the grading rubric is pushed to the
    /// evaluator before the call returns.
    pub async fn create(&self, request: JobPostingRequest) -> Result<JobPosting, RecruitingError> {
        let company = self.company()?;

        let mut posting = JobPosting {
            id: JobPostingId(0), // allocated by the store
            company_id: company.id,
            title: request.title.clone(),
            description: request.description.clone(),
            application_start: request.application_start(),
            application_end: request.application_end(),
            evaluation_end: request.evaluation_end(),
            status: super::domain::PostingStatus::Scheduled,
            weights: weights_from(&request),
            resume_items: resume_items_from(&request),
            cover_letter_questions: questions_from(&request),
        };
        posting.status = resolve_posting_status(
            posting.application_start,
            posting.application_end,
            posting.evaluation_end,
            self.clock.now(),
        );

        let posting = self.store.insert_posting(posting)?;

        // Creation is all-or-nothing: if the evaluator never acknowledges the
        // rubric the posting must not survive, or listings and the status
        // sweep would see a half-created row and a retry would duplicate it.
        let export = build_criteria_export(&posting);
        let trained =
            train_with_timeout(self.evaluator.as_ref(), &export, self.train_timeout).await;
        if let Err(err) = trained {
            if let Err(delete_err) = self.store.delete_posting(posting.id) {
                warn!(
                    job_posting_id = %posting.id,
                    error = %delete_err,
                    "failed to roll back posting after training failure"
                );
            }
            return Err(err.into());
        }

        info!(
            job_posting_id = %posting.id,
            title = %posting.title,
            status = posting.status.label(),
            "job posting created and rubric trained"
        );

        Ok(posting)
    }

    /// Replace a posting's fields and nested definitions wholesale. The status
    /// is recomputed from the new dates; any caller-supplied status is ignored
    /// by construction (the request cannot carry one).
    pub fn update(
        &self,
        id: JobPostingId,
        request: JobPostingRequest,
    ) -> Result<JobPosting, RecruitingError> {
        let existing = self
            .store
            .fetch_posting(id)?
            .ok_or_else(|| RecruitingError::not_found("job posting", id))?;

        let mut posting = JobPosting {
            id: existing.id,
            company_id: existing.company_id,
            title: request.title.clone(),
            description: request.description.clone(),
            application_start: request.application_start(),
            application_end: request.application_end(),
            evaluation_end: request.evaluation_end(),
            status: existing.status,
            weights: weights_from(&request),
            resume_items: resume_items_from(&request),
            cover_letter_questions: questions_from(&request),
        };
        posting.status = resolve_posting_status(
            posting.application_start,
            posting.application_end,
            posting.evaluation_end,
            self.clock.now(),
        );

        Ok(self.store.update_posting(posting)?)
    }

    pub fn get(&self, id: JobPostingId) -> Result<JobPosting, RecruitingError> {
        self.store
            .fetch_posting(id)?
            .ok_or_else(|| RecruitingError::not_found("job posting", id))
    }

    pub fn list(&self) -> Result<Vec<JobPosting>, RecruitingError> {
        Ok(self.store.list_postings()?)
    }

    /// The rubric document as the evaluator would receive it.
    pub fn criteria(&self, id: JobPostingId) -> Result<CriteriaExport, RecruitingError> {
        Ok(build_criteria_export(&self.get(id)?))
    }
}

fn weights_from(request: &JobPostingRequest) -> ScoreWeights {
    ScoreWeights {
        total_score: request.total_score,
        resume_weight_percent: request.resume_score_weight,
        cover_letter_weight_percent: request.cover_letter_score_weight,
        passing_score: request.passing_score,
    }
}

fn resume_items_from(request: &JobPostingRequest) -> Vec<ResumeItem> {
    request
        .resume_items
        .iter()
        .map(|item| ResumeItem {
            id: ResumeItemId(0), // allocated by the store
            name: item.name.clone(),
            item_type: item.item_type,
            required: item.required,
            max_score: item.max_score,
            criteria: item
                .criteria
                .iter()
                .map(|row| GradeCriterion {
                    grade: row.grade,
                    description: row.description.clone(),
                    score_per_grade: row.score_per_grade,
                })
                .collect(),
        })
        .collect()
}

fn questions_from(request: &JobPostingRequest) -> Vec<CoverLetterQuestion> {
    request
        .cover_letter_questions
        .iter()
        .map(|question| CoverLetterQuestion {
            id: CoverLetterQuestionId(0), // allocated by the store
            content: question.content.clone(),
            required: question.required,
            max_characters: question.max_characters,
            criteria: question
                .criteria
                .iter()
                // Criterion rows with blank names carry nothing gradeable.
                .filter(|criterion| !criterion.name.trim().is_empty())
                .map(|criterion| QuestionCriterion {
                    name: criterion.name.clone(),
                    overall_description: criterion.overall_description.clone(),
                    details: criterion
                        .details
                        .iter()
                        .map(|row| GradeCriterion {
                            grade: row.grade,
                            description: row.description.clone(),
                            score_per_grade: row.score_per_grade,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
