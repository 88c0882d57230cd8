use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(CompanyId);
id_newtype!(ApplicantId);
id_newtype!(JobPostingId);
id_newtype!(ApplicationId);
id_newtype!(ResumeItemId);
id_newtype!(CoverLetterQuestionId);

/// The single registered company owning all postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: Option<String>,
}

/// A person identified uniquely by email; may submit to multiple postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub email: String,
}

/// Posting status, a pure function of the three date boundaries and "now".
/// Never accepted from a caller; always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingStatus {
    Scheduled,
    InProgress,
    Closed,
    EvaluationComplete,
}

impl PostingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "Accepting Applications",
            Self::Closed => "Closed",
            Self::EvaluationComplete => "Evaluation Complete",
        }
    }
}

/// Application lifecycle state. `BeforeEvaluation` at submission, `InProgress`
/// once any evaluation result lands, terminal states only via human decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    BeforeEvaluation,
    InProgress,
    Rejected,
    Accepted,
    OnHold,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeforeEvaluation => "Awaiting Evaluation",
            Self::InProgress => "Under Evaluation",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
            Self::OnHold => "On Hold",
        }
    }

    /// Evaluation is considered complete once a human decision has landed.
    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "BEFORE_EVALUATION" => Ok(Self::BeforeEvaluation),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "REJECTED" => Ok(Self::Rejected),
            "ACCEPTED" => Ok(Self::Accepted),
            "ON_HOLD" => Ok(Self::OnHold),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown application status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// Qualitative tier mapped to points via configured criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    Excellent,
    Good,
    Normal,
    Poor,
}

impl Grade {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Normal => "Normal",
            Self::Poor => "Insufficient",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResumeItemType {
    Number,
    Date,
    File,
    Text,
}

/// One grading rubric row: a grade tier with its description and points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCriterion {
    pub grade: Grade,
    pub description: String,
    pub score_per_grade: u32,
}

/// Configurable per-posting resume input field with attached grading criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeItem {
    pub id: ResumeItemId,
    pub name: String,
    pub item_type: ResumeItemType,
    pub required: bool,
    pub max_score: u32,
    pub criteria: Vec<GradeCriterion>,
}

/// Named cover-letter criterion with per-grade detail rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCriterion {
    pub name: String,
    pub overall_description: Option<String>,
    pub details: Vec<GradeCriterion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterQuestion {
    pub id: CoverLetterQuestionId,
    pub content: String,
    pub required: bool,
    pub max_characters: u32,
    pub criteria: Vec<QuestionCriterion>,
}

/// Score weighting configuration for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub total_score: Option<u32>,
    pub resume_weight_percent: u8,
    pub cover_letter_weight_percent: u8,
    pub passing_score: u32,
}

/// An open role with a recruitment window, evaluation window, and grading
/// configuration. Owns its resume item and cover-letter question definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobPostingId,
    pub company_id: CompanyId,
    pub title: String,
    pub description: Option<String>,
    pub application_start: Option<DateTime<Utc>>,
    pub application_end: Option<DateTime<Utc>>,
    pub evaluation_end: Option<DateTime<Utc>>,
    pub status: PostingStatus,
    pub weights: ScoreWeights,
    pub resume_items: Vec<ResumeItem>,
    pub cover_letter_questions: Vec<CoverLetterQuestion>,
}

impl JobPosting {
    pub fn resume_item(&self, id: ResumeItemId) -> Option<&ResumeItem> {
        self.resume_items.iter().find(|item| item.id == id)
    }

    pub fn cover_letter_question(&self, id: CoverLetterQuestionId) -> Option<&CoverLetterQuestion> {
        self.cover_letter_questions.iter().find(|q| q.id == id)
    }
}

/// A stored answer for one resume item; scored in place at reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeItemAnswer {
    pub resume_item_id: ResumeItemId,
    pub content: String,
    pub score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterAnswer {
    pub cover_letter_question_id: CoverLetterQuestionId,
    pub content: String,
}

/// One applicant's submission to one job posting, with its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub job_posting_id: JobPostingId,
    pub status: ApplicationStatus,
    pub evaluation_comment: Option<String>,
    pub total_score: Option<i64>,
    pub submitted_at: DateTime<Utc>,
    pub resume_answers: Vec<ResumeItemAnswer>,
    pub cover_letter_answers: Vec<CoverLetterAnswer>,
}

impl Application {
    /// First stored answer for the given resume item. Duplicate rows should not
    /// occur; when they do the first one receives the score.
    pub fn resume_answer_mut(&mut self, id: ResumeItemId) -> Option<&mut ResumeItemAnswer> {
        self.resume_answers
            .iter_mut()
            .find(|answer| answer.resume_item_id == id)
    }
}
