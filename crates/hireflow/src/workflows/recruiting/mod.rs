//! Recruiting pipeline: posting lifecycle, submission intake, and reconciliation
//! of evaluation results pushed back by the external evaluator.
//!
//! The store and evaluator client are trait seams so the whole workflow can be
//! exercised against in-process implementations.

pub mod applications;
pub mod criteria;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod memory;
pub mod payload;
pub mod postings;
pub mod reconcile;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod scoring;
pub mod status;

#[cfg(test)]
mod tests;

pub use applications::{
    ApplicationDetails, ApplicationService, ApplicationView, PostingStatistics, StatisticsView,
};
pub use criteria::build_criteria_export;
pub use dispatch::{
    train_with_timeout, EvaluatorClient, EvaluatorError, ForwardingPolicy, ForwardingQueue,
};
pub use domain::{
    Applicant, ApplicantId, Application, ApplicationId, ApplicationStatus, Company, CompanyId,
    CoverLetterAnswer, CoverLetterQuestion, CoverLetterQuestionId, Grade, GradeCriterion,
    JobPosting, JobPostingId, PostingStatus, QuestionCriterion, ResumeItem, ResumeItemAnswer,
    ResumeItemId, ResumeItemType, ScoreWeights,
};
pub use errors::RecruitingError;
pub use memory::{FixedClock, InMemoryRecruitingStore};
pub use payload::{
    ApplicationForwarded, CompanyRequest, CoverLetterAnswerInput, CoverLetterEvaluation,
    CoverLetterQuestionRequest, CriteriaExport, CriterionFinding, DecisionRequest,
    EvaluationPayload, GradeCriterionRequest, JobPostingRequest, OverallAnalysis,
    QuestionCriterionRequest, ResumeAnswerInput, ResumeItemEvaluation, ResumeItemRequest,
    ResumeScoreSnapshot, SubmissionRequest,
};
pub use postings::JobPostingService;
pub use reconcile::EvaluationReconciler;
pub use repository::{EvaluationResultRecord, RecruitingStore, StoreError};
pub use router::{recruiting_router, RecruitingState};
pub use scheduler::{Clock, PostingStatusScheduler, StatusSweep, SystemClock};
pub use scoring::{aggregate_resume_score, ScoredResumeItem};
pub use status::resolve_posting_status;
