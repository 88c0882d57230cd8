//! Submission intake, application views, human decisions, and statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::dispatch::ForwardingQueue;
use super::domain::{
    Applicant, Application, ApplicationId, ApplicationStatus, CoverLetterAnswer, JobPosting,
    JobPostingId, PostingStatus, ResumeItemAnswer,
};
use super::errors::RecruitingError;
use super::payload::{
    ApplicationForwarded, ForwardedCoverLetterAnswer, ForwardedResumeAnswer, SubmissionRequest,
};
use super::repository::RecruitingStore;
use super::scheduler::Clock;

/// Sanitized application state for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub job_posting_id: JobPostingId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicationView {
    fn from_application(application: &Application) -> Self {
        Self {
            application_id: application.id,
            job_posting_id: application.job_posting_id,
            status: application.status.label(),
            total_score: application.total_score,
            evaluation_comment: application.evaluation_comment.clone(),
            submitted_at: application.submitted_at,
        }
    }
}

/// Full detail view: applicant identity, answers, and the parsed evaluation
/// snapshot when one has been reconciled.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetails {
    #[serde(flatten)]
    pub view: ApplicationView,
    pub applicant: Applicant,
    pub resume_answers: Vec<ResumeItemAnswer>,
    pub cover_letter_answers: Vec<CoverLetterAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationSnapshotView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSnapshotView {
    pub total_score: i64,
    pub resume_scores: Value,
    pub cover_letter_scores: Value,
    pub overall_analysis: Value,
    pub completed_at: DateTime<Utc>,
}

/// Per-posting and company-wide evaluation progress.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsView {
    pub total_applications: u64,
    pub completed_evaluations: u64,
    pub pending_evaluations: u64,
    pub completion_rate: f64,
    pub postings: Vec<PostingStatistics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostingStatistics {
    pub job_posting_id: JobPostingId,
    pub job_posting_title: String,
    pub posting_status: PostingStatus,
    pub total_applications: u64,
    pub completed_evaluations: u64,
    pub pending_evaluations: u64,
    pub completion_rate: f64,
}

fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Percentage rounded to two decimals.
    (completed as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

/// Application-facing operations over the store, with fire-and-forget
/// forwarding of fresh submissions to the evaluator.
pub struct ApplicationService<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    forwarding: ForwardingQueue,
}

impl<S, C> ApplicationService<S, C>
where
    S: RecruitingStore + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<C>, forwarding: ForwardingQueue) -> Self {
        Self {
            store,
            clock,
            forwarding,
        }
    }

    /// Submit an application. The applicant identity is found-or-created by
    /// email; every answered item/question must exist on the posting. The
    /// stored application is returned before the evaluator hears anything:
    /// forwarding is queued and can never fail the submission.
    pub fn submit(
        &self,
        posting_id: JobPostingId,
        request: SubmissionRequest,
    ) -> Result<ApplicationView, RecruitingError> {
        let posting = self
            .store
            .fetch_posting(posting_id)?
            .ok_or_else(|| RecruitingError::not_found("job posting", posting_id))?;

        let applicant = self
            .store
            .find_or_create_applicant(&request.applicant_name, &request.applicant_email)?;

        let mut resume_answers = Vec::with_capacity(request.resume_item_answers.len());
        for answer in &request.resume_item_answers {
            if posting.resume_item(answer.resume_item_id).is_none() {
                return Err(RecruitingError::not_found(
                    "resume item",
                    answer.resume_item_id,
                ));
            }
            resume_answers.push(ResumeItemAnswer {
                resume_item_id: answer.resume_item_id,
                content: answer.content.clone(),
                score: None,
            });
        }

        let mut cover_letter_answers = Vec::with_capacity(request.cover_letter_question_answers.len());
        for answer in &request.cover_letter_question_answers {
            if posting
                .cover_letter_question(answer.cover_letter_question_id)
                .is_none()
            {
                return Err(RecruitingError::not_found(
                    "cover letter question",
                    answer.cover_letter_question_id,
                ));
            }
            cover_letter_answers.push(CoverLetterAnswer {
                cover_letter_question_id: answer.cover_letter_question_id,
                content: answer.content.clone(),
            });
        }

        let application = self.store.insert_application(Application {
            id: ApplicationId(0), // allocated by the store
            applicant_id: applicant.id,
            job_posting_id: posting.id,
            status: ApplicationStatus::BeforeEvaluation,
            evaluation_comment: None,
            total_score: None,
            submitted_at: self.clock.now(),
            resume_answers,
            cover_letter_answers,
        })?;

        info!(
            application_id = %application.id,
            job_posting_id = %posting.id,
            applicant_id = %applicant.id,
            "application submitted"
        );

        self.forwarding
            .enqueue(forwarded_payload(&application, &applicant, &posting));

        Ok(ApplicationView::from_application(&application))
    }

    pub fn get(&self, id: ApplicationId) -> Result<ApplicationView, RecruitingError> {
        let application = self
            .store
            .fetch_application(id)?
            .ok_or_else(|| RecruitingError::not_found("application", id))?;
        Ok(ApplicationView::from_application(&application))
    }

    /// Detail view including the parsed evaluation snapshot. A snapshot that
    /// no longer parses is an internal fault, not a missing evaluation.
    pub fn details(&self, id: ApplicationId) -> Result<ApplicationDetails, RecruitingError> {
        let application = self
            .store
            .fetch_application(id)?
            .ok_or_else(|| RecruitingError::not_found("application", id))?;
        let applicant = self
            .store
            .fetch_applicant(application.applicant_id)?
            .ok_or_else(|| RecruitingError::not_found("applicant", application.applicant_id))?;

        let evaluation = match self.store.fetch_evaluation(id)? {
            Some(record) => Some(EvaluationSnapshotView {
                total_score: record.total_score,
                resume_scores: serde_json::from_str(&record.resume_scores)?,
                cover_letter_scores: serde_json::from_str(&record.cover_letter_scores)?,
                overall_analysis: serde_json::from_str(&record.overall_analysis)?,
                completed_at: record.completed_at,
            }),
            None => None,
        };

        Ok(ApplicationDetails {
            view: ApplicationView::from_application(&application),
            applicant,
            resume_answers: application.resume_answers.clone(),
            cover_letter_answers: application.cover_letter_answers.clone(),
            evaluation,
        })
    }

    pub fn list(&self) -> Result<Vec<ApplicationView>, RecruitingError> {
        Ok(self
            .store
            .list_applications()?
            .iter()
            .map(ApplicationView::from_application)
            .collect())
    }

    pub fn list_for_posting(
        &self,
        posting_id: JobPostingId,
    ) -> Result<Vec<ApplicationView>, RecruitingError> {
        Ok(self
            .store
            .applications_for_posting(posting_id)?
            .iter()
            .map(ApplicationView::from_application)
            .collect())
    }

    /// Record a human decision: an optional comment plus a status parsed from
    /// its wire form. Junk statuses are rejected before anything is written.
    pub fn record_decision(
        &self,
        id: ApplicationId,
        comment: Option<String>,
        status: &str,
    ) -> Result<ApplicationView, RecruitingError> {
        let parsed: ApplicationStatus = status
            .parse()
            .map_err(|err: super::domain::UnknownStatus| {
                RecruitingError::InvalidArgument(err.to_string())
            })?;

        let mut application = self
            .store
            .fetch_application(id)?
            .ok_or_else(|| RecruitingError::not_found("application", id))?;

        application.evaluation_comment = comment;
        application.status = parsed;
        self.store.update_application(application.clone())?;

        info!(
            application_id = %id,
            status = parsed.label(),
            "application decision recorded"
        );

        Ok(ApplicationView::from_application(&application))
    }

    /// Evaluation progress per posting plus company-wide totals. The overall
    /// numbers only accumulate postings that are currently accepting or
    /// closed for evaluation; scheduled and fully evaluated postings are
    /// reported individually but excluded from the totals.
    pub fn statistics(&self) -> Result<StatisticsView, RecruitingError> {
        let postings = self.store.list_postings()?;
        let mut total_applications = 0u64;
        let mut total_completed = 0u64;
        let mut per_posting = Vec::with_capacity(postings.len());

        for posting in postings {
            let applications = self.store.applications_for_posting(posting.id)?;
            let total = applications.len() as u64;
            let completed = applications
                .iter()
                .filter(|application| application.status.is_decided())
                .count() as u64;

            if matches!(
                posting.status,
                PostingStatus::InProgress | PostingStatus::Closed
            ) {
                total_applications += total;
                total_completed += completed;
            }

            per_posting.push(PostingStatistics {
                job_posting_id: posting.id,
                job_posting_title: posting.title.clone(),
                posting_status: posting.status,
                total_applications: total,
                completed_evaluations: completed,
                pending_evaluations: total - completed,
                completion_rate: completion_rate(completed, total),
            });
        }

        Ok(StatisticsView {
            total_applications,
            completed_evaluations: total_completed,
            pending_evaluations: total_applications - total_completed,
            completion_rate: completion_rate(total_completed, total_applications),
            postings: per_posting,
        })
    }
}

fn forwarded_payload(
    application: &Application,
    applicant: &Applicant,
    posting: &JobPosting,
) -> ApplicationForwarded {
    ApplicationForwarded {
        application_id: application.id,
        job_posting_id: posting.id,
        applicant_id: applicant.id,
        applicant_name: applicant.name.clone(),
        applicant_email: applicant.email.clone(),
        resume_item_answers: application
            .resume_answers
            .iter()
            .map(|answer| ForwardedResumeAnswer {
                resume_item_id: answer.resume_item_id,
                resume_item_name: posting
                    .resume_item(answer.resume_item_id)
                    .map(|item| item.name.clone())
                    .unwrap_or_default(),
                resume_content: answer.content.clone(),
            })
            .collect(),
        cover_letter_question_answers: application
            .cover_letter_answers
            .iter()
            .map(|answer| ForwardedCoverLetterAnswer {
                cover_letter_question_id: answer.cover_letter_question_id,
                question_content: posting
                    .cover_letter_question(answer.cover_letter_question_id)
                    .map(|question| question.content.clone())
                    .unwrap_or_default(),
                answer_content: answer.content.clone(),
            })
            .collect(),
    }
}
