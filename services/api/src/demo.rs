use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use clap::Args;

use hireflow::error::AppError;
use hireflow::workflows::recruiting::{
    ApplicationService, CompanyRequest, CoverLetterAnswerInput, CoverLetterEvaluation,
    CoverLetterQuestionRequest, CriterionFinding, EvaluationPayload, EvaluationReconciler,
    FixedClock, ForwardingPolicy, ForwardingQueue, Grade, GradeCriterionRequest,
    InMemoryRecruitingStore, JobPosting, JobPostingRequest, JobPostingService, OverallAnalysis,
    QuestionCriterionRequest, ResumeAnswerInput, ResumeItemEvaluation, ResumeItemRequest,
    ResumeItemType, SubmissionRequest,
};

use crate::infra::LoggingEvaluatorClient;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin "today" for the demo (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of applicants to submit.
    #[arg(long, default_value_t = 3)]
    pub(crate) applicants: u32,
    /// Skip the evaluation ingestion and decision portion of the demo.
    #[arg(long)]
    pub(crate) skip_evaluation: bool,
}

/// Exercise the whole workflow in process: register a company, open a posting,
/// take submissions, feed back evaluation results, record a decision, and
/// print the statistics a recruiter would see.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        applicants,
        skip_evaluation,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let now = today
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
        .and_utc();

    println!("Recruiting workflow demo ({today})");

    let store = Arc::new(InMemoryRecruitingStore::new());
    let clock = Arc::new(FixedClock(now));
    let evaluator = Arc::new(LoggingEvaluatorClient);
    let (forwarding, _worker) = ForwardingQueue::spawn(
        evaluator.clone(),
        ForwardingPolicy {
            queue_capacity: 16,
            call_timeout: Duration::from_secs(1),
            max_attempts: 2,
            backoff_base: Duration::from_millis(50),
        },
    );
    let postings = JobPostingService::new(
        store.clone(),
        evaluator,
        clock.clone(),
        Duration::from_secs(5),
    );
    let applications = ApplicationService::new(store.clone(), clock.clone(), forwarding);
    let reconciler = EvaluationReconciler::new(store, clock);

    let company = postings.register_company(CompanyRequest {
        name: "Acme Robotics".to_string(),
        description: Some("Builds delivery robots".to_string()),
    })?;
    println!("- Registered company '{}'", company.name);

    let posting = postings.create(demo_posting_request(today)).await?;
    println!(
        "- Opened posting '{}' (status: {})",
        posting.title,
        posting.status.label()
    );

    let emails: Vec<String> = (1..=applicants)
        .map(|n| format!("applicant{n}@example.com"))
        .collect();
    for email in &emails {
        let view = applications.submit(posting.id, demo_submission(&posting, email))?;
        println!(
            "- Application {} received from {} -> {}",
            view.application_id, email, view.status
        );
    }

    if skip_evaluation {
        return Ok(());
    }

    println!("\nEvaluation results arrive asynchronously:");
    for (index, email) in emails.iter().enumerate() {
        let record = reconciler.ingest(demo_evaluation(&posting, email, index as i32))?;
        println!(
            "- {} scored {} points",
            email, record.total_score
        );
    }

    if let Some(first) = applications
        .list_for_posting(posting.id)?
        .first()
        .map(|view| view.application_id)
    {
        let decided = applications.record_decision(
            first,
            Some("Strong systems background".to_string()),
            "ACCEPTED",
        )?;
        println!(
            "\n- Recorded decision for application {}: {}",
            first, decided.status
        );

        let details = applications.details(first)?;
        match serde_json::to_string_pretty(&details) {
            Ok(json) => println!("\nApplication details payload:\n{json}"),
            Err(err) => println!("Application details unavailable: {err}"),
        }
    }

    let stats = applications.statistics()?;
    println!("\nEvaluation progress:");
    for entry in &stats.postings {
        println!(
            "- {} [{}]: {}/{} evaluated ({}%)",
            entry.job_posting_title,
            entry.posting_status.label(),
            entry.completed_evaluations,
            entry.total_applications,
            entry.completion_rate
        );
    }
    println!(
        "Overall: {}/{} complete ({}%)",
        stats.completed_evaluations, stats.total_applications, stats.completion_rate
    );

    Ok(())
}

fn demo_posting_request(today: NaiveDate) -> JobPostingRequest {
    JobPostingRequest {
        title: "Backend Engineer".to_string(),
        description: Some("Own the order ingestion pipeline".to_string()),
        application_start_date: Some(today - ChronoDuration::days(7)),
        application_end_date: Some(today + ChronoDuration::days(14)),
        evaluation_end_date: Some(today + ChronoDuration::days(28)),
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

fn demo_submission(posting: &JobPosting, email: &str) -> SubmissionRequest {
    SubmissionRequest {
        applicant_name: email
            .split('@')
            .next()
            .unwrap_or("applicant")
            .to_string(),
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
                content: "I have followed your robotics work for years.".to_string(),
            })
            .collect(),
    }
}

fn demo_evaluation(posting: &JobPosting, email: &str, spread: i32) -> EvaluationPayload {
    EvaluationPayload {
        applicant_name: email
            .split('@')
            .next()
            .unwrap_or("applicant")
            .to_string(),
        applicant_email: email.to_string(),
        application_id: None,
        job_posting_id: posting.id,
        resume_evaluations: posting
            .resume_items
            .iter()
            .map(|item| ResumeItemEvaluation {
                resume_item_id: item.id,
                resume_item_name: item.name.clone(),
                resume_content: format!("answer for {}", item.name),
                score: Some(((item.max_score as i32) - spread).max(0)),
            })
            .collect(),
        cover_letter_evaluations: posting
            .cover_letter_questions
            .iter()
            .map(|question| CoverLetterEvaluation {
                cover_letter_question_id: question.id,
                keywords: vec!["motivation".to_string()],
                summary: "Clear and specific".to_string(),
                answer_evaluations: vec![CriterionFinding {
                    criterion_name: "Motivation".to_string(),
                    grade: Grade::Excellent,
                    evaluated_content: "I have followed your robotics work for years.".to_string(),
                    reason: "Names concrete projects".to_string(),
                }],
            })
            .collect(),
        overall_analysis: Some(OverallAnalysis {
            evaluation: "Solid backend profile".to_string(),
            strengths: vec!["Production experience".to_string()],
            improvement_points: vec!["Little frontend exposure".to_string()],
            recommendation: "PASS".to_string(),
            confidence: 0.8,
        }),
    }
}
