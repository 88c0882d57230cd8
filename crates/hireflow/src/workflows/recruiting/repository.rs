use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Applicant, ApplicantId, Application, ApplicationId, Company, JobPosting, JobPostingId,
};

/// Denormalized snapshot of one application's externally computed evaluation.
/// At most one row exists per application; re-ingestion replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResultRecord {
    pub application_id: ApplicationId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub job_posting_id: JobPostingId,
    pub total_score: i64,
    /// Serialized itemized resume scores (JSON, opaque to the store).
    pub resume_scores: String,
    /// Serialized itemized cover-letter evaluations (JSON, opaque to the store).
    pub cover_letter_scores: String,
    /// Serialized overall narrative analysis (JSON, opaque to the store).
    pub overall_analysis: String,
    pub completed_at: DateTime<Utc>,
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable keyed store for the recruiting workflow.
///
/// The only shared mutable resource in the system. Implementations must make
/// [`RecruitingStore::commit_evaluation`] a single transactional unit and
/// serialize concurrent commits touching the same application row.
pub trait RecruitingStore: Send + Sync {
    // Company (single-company assumption).
    fn register_company(&self, name: String, description: Option<String>)
        -> Result<Company, StoreError>;
    fn fetch_company(&self) -> Result<Option<Company>, StoreError>;

    // Applicants, keyed by unique email.
    fn fetch_applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, StoreError>;
    fn find_applicant_by_email(&self, email: &str) -> Result<Option<Applicant>, StoreError>;
    fn find_or_create_applicant(&self, name: &str, email: &str) -> Result<Applicant, StoreError>;

    // Job postings. `insert_posting` allocates the posting id and the ids of
    // every owned resume item and cover-letter question.
    fn insert_posting(&self, posting: JobPosting) -> Result<JobPosting, StoreError>;
    fn update_posting(&self, posting: JobPosting) -> Result<JobPosting, StoreError>;
    fn fetch_posting(&self, id: JobPostingId) -> Result<Option<JobPosting>, StoreError>;
    fn list_postings(&self) -> Result<Vec<JobPosting>, StoreError>;
    /// Remove a posting and its owned rubric rows. `NotFound` if absent.
    fn delete_posting(&self, id: JobPostingId) -> Result<(), StoreError>;

    // Applications. `insert_application` allocates the application id.
    fn insert_application(&self, application: Application) -> Result<Application, StoreError>;
    fn update_application(&self, application: Application) -> Result<(), StoreError>;
    fn fetch_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError>;
    fn list_applications(&self) -> Result<Vec<Application>, StoreError>;
    fn applications_for_posting(&self, id: JobPostingId) -> Result<Vec<Application>, StoreError>;
    /// Ordered by creation, oldest first.
    fn applications_for_applicant(&self, id: ApplicantId) -> Result<Vec<Application>, StoreError>;
    fn application_for_email_and_posting(
        &self,
        email: &str,
        posting: JobPostingId,
    ) -> Result<Option<Application>, StoreError>;

    // Evaluation results, keyed 1:1 by application id.
    fn fetch_evaluation(
        &self,
        application_id: ApplicationId,
    ) -> Result<Option<EvaluationResultRecord>, StoreError>;
    /// Persist a reconciliation outcome atomically: the updated application row
    /// (status, answer scores, aggregate score) together with the replacement
    /// evaluation result. Either both land or neither does.
    fn commit_evaluation(
        &self,
        application: Application,
        result: EvaluationResultRecord,
    ) -> Result<(), StoreError>;
}
