//! In-memory reference implementation of [`RecruitingStore`].
//!
//! A single mutex guards all tables, so `commit_evaluation` is trivially
//! atomic and commits touching the same application are serialized. Suitable
//! for the demo server and tests; a SQL-backed store slots in behind the same
//! trait.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::domain::{
    Applicant, ApplicantId, Application, ApplicationId, Company, CompanyId, CoverLetterQuestionId,
    JobPosting, JobPostingId, ResumeItemId,
};
use super::repository::{EvaluationResultRecord, RecruitingStore, StoreError};

#[derive(Default)]
struct Tables {
    company: Option<Company>,
    applicants: HashMap<ApplicantId, Applicant>,
    postings: HashMap<JobPostingId, JobPosting>,
    applications: HashMap<ApplicationId, Application>,
    evaluations: HashMap<ApplicationId, EvaluationResultRecord>,
    next_applicant: u64,
    next_posting: u64,
    next_application: u64,
    next_resume_item: u64,
    next_question: u64,
}

impl Tables {
    fn new() -> Self {
        Self {
            next_applicant: 1,
            next_posting: 1,
            next_application: 1,
            next_resume_item: 1,
            next_question: 1,
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct InMemoryRecruitingStore {
    tables: Mutex<Tables>,
}

impl InMemoryRecruitingStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::new()),
        }
    }

    /// Test/demo helper: stored evaluation rows for one application (0 or 1).
    pub fn evaluation_count(&self, id: ApplicationId) -> usize {
        let tables = self.lock();
        usize::from(tables.evaluations.contains_key(&id))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("store mutex poisoned")
    }
}

fn sorted_by_creation(mut applications: Vec<Application>) -> Vec<Application> {
    applications.sort_by_key(|application| application.id);
    applications
}

impl RecruitingStore for InMemoryRecruitingStore {
    fn register_company(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Company, StoreError> {
        let mut tables = self.lock();
        if tables.company.is_some() {
            return Err(StoreError::Conflict);
        }
        let company = Company {
            id: CompanyId(1),
            name,
            description,
        };
        tables.company = Some(company.clone());
        Ok(company)
    }

    fn fetch_company(&self) -> Result<Option<Company>, StoreError> {
        Ok(self.lock().company.clone())
    }

    fn fetch_applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, StoreError> {
        Ok(self.lock().applicants.get(&id).cloned())
    }

    fn find_applicant_by_email(&self, email: &str) -> Result<Option<Applicant>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .applicants
            .values()
            .find(|applicant| applicant.email == email)
            .cloned())
    }

    fn find_or_create_applicant(&self, name: &str, email: &str) -> Result<Applicant, StoreError> {
        let mut tables = self.lock();
        if let Some(existing) = tables
            .applicants
            .values()
            .find(|applicant| applicant.email == email)
        {
            return Ok(existing.clone());
        }
        let applicant = Applicant {
            id: ApplicantId(tables.next_applicant),
            name: name.to_string(),
            email: email.to_string(),
        };
        tables.next_applicant += 1;
        tables.applicants.insert(applicant.id, applicant.clone());
        Ok(applicant)
    }

    fn insert_posting(&self, mut posting: JobPosting) -> Result<JobPosting, StoreError> {
        let mut tables = self.lock();
        posting.id = JobPostingId(tables.next_posting);
        tables.next_posting += 1;
        for item in &mut posting.resume_items {
            item.id = ResumeItemId(tables.next_resume_item);
            tables.next_resume_item += 1;
        }
        for question in &mut posting.cover_letter_questions {
            question.id = CoverLetterQuestionId(tables.next_question);
            tables.next_question += 1;
        }
        tables.postings.insert(posting.id, posting.clone());
        Ok(posting)
    }

    fn update_posting(&self, mut posting: JobPosting) -> Result<JobPosting, StoreError> {
        let mut tables = self.lock();
        if !tables.postings.contains_key(&posting.id) {
            return Err(StoreError::NotFound);
        }
        // Definitions are replaced wholesale on update; fresh rows get fresh ids.
        for item in &mut posting.resume_items {
            if item.id.0 == 0 {
                item.id = ResumeItemId(tables.next_resume_item);
                tables.next_resume_item += 1;
            }
        }
        for question in &mut posting.cover_letter_questions {
            if question.id.0 == 0 {
                question.id = CoverLetterQuestionId(tables.next_question);
                tables.next_question += 1;
            }
        }
        tables.postings.insert(posting.id, posting.clone());
        Ok(posting)
    }

    fn fetch_posting(&self, id: JobPostingId) -> Result<Option<JobPosting>, StoreError> {
        Ok(self.lock().postings.get(&id).cloned())
    }

    fn delete_posting(&self, id: JobPostingId) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if tables.postings.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn list_postings(&self) -> Result<Vec<JobPosting>, StoreError> {
        let tables = self.lock();
        let mut postings: Vec<_> = tables.postings.values().cloned().collect();
        postings.sort_by_key(|posting| posting.id);
        Ok(postings)
    }

    fn insert_application(&self, mut application: Application) -> Result<Application, StoreError> {
        let mut tables = self.lock();
        application.id = ApplicationId(tables.next_application);
        tables.next_application += 1;
        tables
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if !tables.applications.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        tables.applications.insert(application.id, application);
        Ok(())
    }

    fn fetch_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self.lock().applications.get(&id).cloned())
    }

    fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        Ok(sorted_by_creation(
            self.lock().applications.values().cloned().collect(),
        ))
    }

    fn applications_for_posting(&self, id: JobPostingId) -> Result<Vec<Application>, StoreError> {
        Ok(sorted_by_creation(
            self.lock()
                .applications
                .values()
                .filter(|application| application.job_posting_id == id)
                .cloned()
                .collect(),
        ))
    }

    fn applications_for_applicant(&self, id: ApplicantId) -> Result<Vec<Application>, StoreError> {
        Ok(sorted_by_creation(
            self.lock()
                .applications
                .values()
                .filter(|application| application.applicant_id == id)
                .cloned()
                .collect(),
        ))
    }

    fn application_for_email_and_posting(
        &self,
        email: &str,
        posting: JobPostingId,
    ) -> Result<Option<Application>, StoreError> {
        let tables = self.lock();
        let applicant = tables
            .applicants
            .values()
            .find(|applicant| applicant.email == email);
        let Some(applicant) = applicant else {
            return Ok(None);
        };
        let mut matches: Vec<_> = tables
            .applications
            .values()
            .filter(|application| {
                application.applicant_id == applicant.id && application.job_posting_id == posting
            })
            .cloned()
            .collect();
        matches.sort_by_key(|application| application.id);
        Ok(matches.pop())
    }

    fn fetch_evaluation(
        &self,
        application_id: ApplicationId,
    ) -> Result<Option<EvaluationResultRecord>, StoreError> {
        Ok(self.lock().evaluations.get(&application_id).cloned())
    }

    fn commit_evaluation(
        &self,
        application: Application,
        result: EvaluationResultRecord,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if !tables.applications.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        // Both writes happen under the one lock: the application row and the
        // wholesale replacement of any prior evaluation result.
        tables
            .applications
            .insert(application.id, application.clone());
        tables.evaluations.insert(application.id, result);
        Ok(())
    }
}

/// Fixed clock for deterministic tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl super::scheduler::Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
