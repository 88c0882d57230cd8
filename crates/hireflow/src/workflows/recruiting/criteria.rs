//! Criteria export: the grading rubric document handed to the evaluator when a
//! posting is created.

use super::domain::{JobPosting, ResumeItem};
use super::payload::{
    CoverLetterQuestionCriteria, CriteriaExport, ExportedGradeRow, ExportedQuestionCriterion,
    ResumeItemCriteria,
};

/// Resume items that carry identity data rather than gradeable content. They
/// are stored and forwarded with submissions but never part of the rubric.
const IDENTITY_ITEM_NAMES: [&str; 4] = ["name", "email", "phone", "phone number"];

fn is_identity_item(item: &ResumeItem) -> bool {
    let name = item.name.trim().to_ascii_lowercase();
    IDENTITY_ITEM_NAMES.contains(&name.as_str())
}

/// Whether a resume item belongs in the evaluator-facing rubric. Items with no
/// criteria or a zero maximum have nothing to grade against; identity fields
/// are excluded outright.
fn is_exportable(item: &ResumeItem) -> bool {
    !item.criteria.is_empty() && item.max_score > 0 && !is_identity_item(item)
}

pub fn build_criteria_export(posting: &JobPosting) -> CriteriaExport {
    let resume_criteria = posting
        .resume_items
        .iter()
        .filter(|item| is_exportable(item))
        .map(|item| ResumeItemCriteria {
            resume_item_id: item.id,
            resume_item_name: item.name.clone(),
            resume_item_type: item.item_type,
            required: item.required,
            max_score: item.max_score,
            criteria: item
                .criteria
                .iter()
                .map(|row| ExportedGradeRow {
                    grade: row.grade,
                    description: row.description.clone(),
                    score_per_grade: row.score_per_grade,
                })
                .collect(),
        })
        .collect();

    let cover_letter_criteria = posting
        .cover_letter_questions
        .iter()
        .filter(|question| !question.criteria.is_empty())
        .map(|question| CoverLetterQuestionCriteria {
            cover_letter_question_id: question.id,
            question_content: question.content.clone(),
            required: question.required,
            max_characters: question.max_characters,
            criteria: question
                .criteria
                .iter()
                .map(|criterion| ExportedQuestionCriterion {
                    criteria_name: criterion.name.clone(),
                    overall_description: criterion.overall_description.clone(),
                    details: criterion
                        .details
                        .iter()
                        .map(|row| ExportedGradeRow {
                            grade: row.grade,
                            description: row.description.clone(),
                            score_per_grade: row.score_per_grade,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    CriteriaExport {
        job_posting_id: posting.id,
        job_posting_title: posting.title.clone(),
        total_score: posting.weights.total_score,
        resume_score_weight: posting.weights.resume_weight_percent,
        cover_letter_score_weight: posting.weights.cover_letter_weight_percent,
        passing_score: posting.weights.passing_score,
        resume_criteria,
        cover_letter_criteria,
    }
}
