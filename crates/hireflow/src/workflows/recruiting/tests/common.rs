use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::workflows::recruiting::applications::ApplicationService;
use crate::workflows::recruiting::dispatch::{
    EvaluatorClient, EvaluatorError, ForwardingPolicy, ForwardingQueue,
};
use crate::workflows::recruiting::memory::{FixedClock, InMemoryRecruitingStore};
use crate::workflows::recruiting::payload::{
    ApplicationForwarded, CompanyRequest, CoverLetterAnswerInput, CoverLetterQuestionRequest,
    CriteriaExport, CriterionFinding, CoverLetterEvaluation, EvaluationPayload,
    GradeCriterionRequest, JobPostingRequest, OverallAnalysis, QuestionCriterionRequest,
    ResumeAnswerInput, ResumeItemEvaluation, ResumeItemRequest, SubmissionRequest,
};
use crate::workflows::recruiting::postings::JobPostingService;
use crate::workflows::recruiting::reconcile::EvaluationReconciler;
use crate::workflows::recruiting::domain::{Grade, JobPosting, ResumeItemType};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d)
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
        .and_utc()
}

/// Evaluator double that records every call and can be told to fail.
#[derive(Default)]
pub(super) struct RecordingEvaluator {
    pub submissions: Mutex<Vec<ApplicationForwarded>>,
    pub trainings: Mutex<Vec<CriteriaExport>>,
    pub fail_submissions: Mutex<bool>,
    pub fail_trainings: Mutex<bool>,
}

impl RecordingEvaluator {
    pub fn failing_training() -> Self {
        let evaluator = Self::default();
        *evaluator.fail_trainings.lock().expect("poisoned") = true;
        evaluator
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().expect("poisoned").len()
    }
}

#[async_trait]
impl EvaluatorClient for RecordingEvaluator {
    async fn submit_application(
        &self,
        payload: &ApplicationForwarded,
    ) -> Result<(), EvaluatorError> {
        if *self.fail_submissions.lock().expect("poisoned") {
            return Err(EvaluatorError::Transport("connection refused".to_string()));
        }
        self.submissions
            .lock()
            .expect("poisoned")
            .push(payload.clone());
        Ok(())
    }

    async fn train_criteria(&self, export: &CriteriaExport) -> Result<(), EvaluatorError> {
        if *self.fail_trainings.lock().expect("poisoned") {
            return Err(EvaluatorError::Rejected("invalid rubric".to_string()));
        }
        self.trainings.lock().expect("poisoned").push(export.clone());
        Ok(())
    }
}

pub(super) struct Harness {
    pub store: Arc<InMemoryRecruitingStore>,
    pub evaluator: Arc<RecordingEvaluator>,
    pub postings: JobPostingService<InMemoryRecruitingStore, RecordingEvaluator, FixedClock>,
    pub applications: ApplicationService<InMemoryRecruitingStore, FixedClock>,
    pub reconciler: EvaluationReconciler<InMemoryRecruitingStore, FixedClock>,
}

/// Wire every service against one in-memory store and a fixed clock. The
/// forwarding queue gets a real worker with a short retry policy.
pub(super) fn harness(now: DateTime<Utc>) -> Harness {
    let store = Arc::new(InMemoryRecruitingStore::new());
    let clock = Arc::new(FixedClock(now));
    let evaluator = Arc::new(RecordingEvaluator::default());

    let policy = ForwardingPolicy {
        queue_capacity: 16,
        call_timeout: Duration::from_secs(1),
        max_attempts: 2,
        backoff_base: Duration::from_millis(10),
    };
    let (forwarding, _worker) = ForwardingQueue::spawn(evaluator.clone(), policy);

    let postings = JobPostingService::new(
        store.clone(),
        evaluator.clone(),
        clock.clone(),
        Duration::from_secs(1),
    );
    let applications = ApplicationService::new(store.clone(), clock.clone(), forwarding);
    let reconciler = EvaluationReconciler::new(store.clone(), clock.clone());

    let harness = Harness {
        store,
        evaluator,
        postings,
        applications,
        reconciler,
    };
    harness
        .postings
        .register_company(CompanyRequest {
            name: "Acme Robotics".to_string(),
            description: Some("Builds robots".to_string()),
        })
        .expect("company registers");
    harness
}

/// Posting open through January 2025, evaluated through mid-February.
pub(super) fn posting_request() -> JobPostingRequest {
    JobPostingRequest {
        title: "Backend Engineer".to_string(),
        description: Some("Own the ingestion pipeline".to_string()),
        application_start_date: Some(date(2025, 1, 1)),
        application_end_date: Some(date(2025, 1, 31)),
        evaluation_end_date: Some(date(2025, 2, 15)),
        total_score: Some(15),
        resume_score_weight: 70,
        cover_letter_score_weight: 30,
        passing_score: 10,
        resume_items: vec![
            ResumeItemRequest {
                name: "Work Experience".to_string(),
                item_type: ResumeItemType::Text,
                required: true,
                max_score: 10,
                criteria: vec![
                    GradeCriterionRequest {
                        grade: Grade::Excellent,
                        description: "5+ years of backend work".to_string(),
                        score_per_grade: 10,
                    },
                    GradeCriterionRequest {
                        grade: Grade::Normal,
                        description: "Some backend exposure".to_string(),
                        score_per_grade: 5,
                    },
                ],
            },
            ResumeItemRequest {
                name: "Certifications".to_string(),
                item_type: ResumeItemType::Text,
                required: false,
                max_score: 5,
                criteria: vec![GradeCriterionRequest {
                    grade: Grade::Good,
                    description: "Relevant certification".to_string(),
                    score_per_grade: 5,
                }],
            },
            // Identity field: stored and forwarded, never part of the rubric.
            ResumeItemRequest {
                name: "Email".to_string(),
                item_type: ResumeItemType::Text,
                required: true,
                max_score: 0,
                criteria: Vec::new(),
            },
        ],
        cover_letter_questions: vec![CoverLetterQuestionRequest {
            content: "Why do you want to join?".to_string(),
            required: true,
            max_characters: 500,
            criteria: vec![QuestionCriterionRequest {
                name: "Motivation".to_string(),
                overall_description: Some("Genuine interest in the role".to_string()),
                details: vec![GradeCriterionRequest {
                    grade: Grade::Excellent,
                    description: "Specific and personal".to_string(),
                    score_per_grade: 5,
                }],
            }],
        }],
    }
}

pub(super) async fn create_posting(harness: &Harness) -> JobPosting {
    harness
        .postings
        .create(posting_request())
        .await
        .expect("posting creates")
}

pub(super) fn submission(posting: &JobPosting, email: &str) -> SubmissionRequest {
    SubmissionRequest {
        applicant_name: "Jordan Reyes".to_string(),
        applicant_email: email.to_string(),
        resume_item_answers: posting
            .resume_items
            .iter()
            .map(|item| ResumeAnswerInput {
                resume_item_id: item.id,
                content: format!("answer for {}", item.name),
            })
            .collect(),
        cover_letter_question_answers: posting
            .cover_letter_questions
            .iter()
            .map(|question| CoverLetterAnswerInput {
                cover_letter_question_id: question.id,
                content: "I have followed your work for years.".to_string(),
            })
            .collect(),
    }
}

/// Evaluation payload scoring the first resume item 8/10 and the second 5/5.
pub(super) fn evaluation_payload(posting: &JobPosting, email: &str) -> EvaluationPayload {
    EvaluationPayload {
        applicant_name: "Jordan Reyes".to_string(),
        applicant_email: email.to_string(),
        application_id: None,
        job_posting_id: posting.id,
        resume_evaluations: vec![
            ResumeItemEvaluation {
                resume_item_id: posting.resume_items[0].id,
                resume_item_name: posting.resume_items[0].name.clone(),
                resume_content: "answer for Work Experience".to_string(),
                score: Some(8),
            },
            ResumeItemEvaluation {
                resume_item_id: posting.resume_items[1].id,
                resume_item_name: posting.resume_items[1].name.clone(),
                resume_content: "answer for Certifications".to_string(),
                score: Some(5),
            },
        ],
        cover_letter_evaluations: vec![CoverLetterEvaluation {
            cover_letter_question_id: posting.cover_letter_questions[0].id,
            keywords: vec!["motivation".to_string()],
            summary: "Clear and specific".to_string(),
            answer_evaluations: vec![CriterionFinding {
                criterion_name: "Motivation".to_string(),
                grade: Grade::Excellent,
                evaluated_content: "I have followed your work for years.".to_string(),
                reason: "Names concrete projects".to_string(),
            }],
        }],
        overall_analysis: Some(OverallAnalysis {
            evaluation: "Strong backend profile".to_string(),
            strengths: vec!["Production experience".to_string()],
            improvement_points: vec!["Little frontend exposure".to_string()],
            recommendation: "PASS".to_string(),
            confidence: 0.87,
        }),
    }
}
