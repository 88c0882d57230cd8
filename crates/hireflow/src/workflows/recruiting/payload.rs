//! Wire payloads for the submission intake, the evaluation intake pushed by the
//! external evaluator, and the criteria export consumed by it.
//!
//! Each shape is an explicit tagged structure validated once at the boundary;
//! nothing downstream touches loosely-typed maps.

use super::domain::{
    ApplicantId, ApplicationId, CoverLetterQuestionId, Grade, JobPostingId, ResumeItemId,
    ResumeItemType,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Submission intake: one applicant's answers for a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(default)]
    pub resume_item_answers: Vec<ResumeAnswerInput>,
    #[serde(default)]
    pub cover_letter_question_answers: Vec<CoverLetterAnswerInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnswerInput {
    pub resume_item_id: ResumeItemId,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterAnswerInput {
    pub cover_letter_question_id: CoverLetterQuestionId,
    pub content: String,
}

/// Evaluation intake pushed asynchronously by the external evaluator.
///
/// `application_id` is optional; absent or stale ids fall back to resolution by
/// applicant email. Delivery is at-least-once, so ingestion must be idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationPayload {
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(default)]
    pub application_id: Option<ApplicationId>,
    pub job_posting_id: JobPostingId,
    #[serde(default)]
    pub resume_evaluations: Vec<ResumeItemEvaluation>,
    #[serde(default)]
    pub cover_letter_evaluations: Vec<CoverLetterEvaluation>,
    #[serde(default)]
    pub overall_analysis: Option<OverallAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeItemEvaluation {
    pub resume_item_id: ResumeItemId,
    pub resume_item_name: String,
    pub resume_content: String,
    #[serde(default)]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterEvaluation {
    pub cover_letter_question_id: CoverLetterQuestionId,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub answer_evaluations: Vec<CriterionFinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionFinding {
    pub criterion_name: String,
    pub grade: Grade,
    pub evaluated_content: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallAnalysis {
    pub evaluation: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_points: Vec<String>,
    pub recommendation: String,
    pub confidence: f64,
}

/// One row of the serialized resume score snapshot stored on the evaluation
/// result: the evaluator's entry enriched with the item's configured maximum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeScoreSnapshot {
    pub resume_item_id: ResumeItemId,
    pub resume_item_name: String,
    pub resume_content: String,
    pub score: Option<i32>,
    pub max_score: u32,
}

/// Submission data forwarded to the evaluator, fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForwarded {
    pub application_id: ApplicationId,
    pub job_posting_id: JobPostingId,
    pub applicant_id: ApplicantId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_item_answers: Vec<ForwardedResumeAnswer>,
    pub cover_letter_question_answers: Vec<ForwardedCoverLetterAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardedResumeAnswer {
    pub resume_item_id: ResumeItemId,
    pub resume_item_name: String,
    pub resume_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardedCoverLetterAnswer {
    pub cover_letter_question_id: CoverLetterQuestionId,
    pub question_content: String,
    pub answer_content: String,
}

/// Grading rubric document sent to the evaluator at posting creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaExport {
    pub job_posting_id: JobPostingId,
    pub job_posting_title: String,
    pub total_score: Option<u32>,
    pub resume_score_weight: u8,
    pub cover_letter_score_weight: u8,
    pub passing_score: u32,
    pub resume_criteria: Vec<ResumeItemCriteria>,
    pub cover_letter_criteria: Vec<CoverLetterQuestionCriteria>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeItemCriteria {
    pub resume_item_id: ResumeItemId,
    pub resume_item_name: String,
    pub resume_item_type: ResumeItemType,
    pub required: bool,
    pub max_score: u32,
    pub criteria: Vec<ExportedGradeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedGradeRow {
    pub grade: Grade,
    pub description: String,
    pub score_per_grade: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterQuestionCriteria {
    pub cover_letter_question_id: CoverLetterQuestionId,
    pub question_content: String,
    pub required: bool,
    pub max_characters: u32,
    pub criteria: Vec<ExportedQuestionCriterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedQuestionCriterion {
    pub criteria_name: String,
    pub overall_description: Option<String>,
    pub details: Vec<ExportedGradeRow>,
}

/// Posting create/update request. Dates arrive as calendar days and are pinned
/// to midnight UTC; the posting status is always computed, never accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPostingRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub application_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub application_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub evaluation_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_score: Option<u32>,
    pub resume_score_weight: u8,
    pub cover_letter_score_weight: u8,
    pub passing_score: u32,
    #[serde(default)]
    pub resume_items: Vec<ResumeItemRequest>,
    #[serde(default)]
    pub cover_letter_questions: Vec<CoverLetterQuestionRequest>,
}

impl JobPostingRequest {
    pub fn application_start(&self) -> Option<DateTime<Utc>> {
        self.application_start_date.map(midnight_utc)
    }

    pub fn application_end(&self) -> Option<DateTime<Utc>> {
        self.application_end_date.map(midnight_utc)
    }

    pub fn evaluation_end(&self) -> Option<DateTime<Utc>> {
        self.evaluation_end_date.map(midnight_utc)
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeItemRequest {
    pub name: String,
    pub item_type: ResumeItemType,
    #[serde(default)]
    pub required: bool,
    pub max_score: u32,
    #[serde(default)]
    pub criteria: Vec<GradeCriterionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeCriterionRequest {
    pub grade: Grade,
    pub description: String,
    pub score_per_grade: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterQuestionRequest {
    pub content: String,
    #[serde(default)]
    pub required: bool,
    pub max_characters: u32,
    #[serde(default)]
    pub criteria: Vec<QuestionCriterionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCriterionRequest {
    pub name: String,
    #[serde(default)]
    pub overall_description: Option<String>,
    #[serde(default)]
    pub details: Vec<GradeCriterionRequest>,
}

/// Human decision recorded against an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    #[serde(default)]
    pub comment: Option<String>,
    pub status: String,
}

/// Company registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
