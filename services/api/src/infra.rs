use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

use hireflow::workflows::recruiting::{
    ApplicationForwarded, CriteriaExport, EvaluatorClient, EvaluatorError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Evaluator client that acknowledges every call and logs its content. Stands
/// in until the external evaluator endpoint is wired up; the push direction
/// (evaluator to us) already works through `/api/v1/evaluations`.
#[derive(Default)]
pub(crate) struct LoggingEvaluatorClient;

#[async_trait]
impl EvaluatorClient for LoggingEvaluatorClient {
    async fn submit_application(
        &self,
        payload: &ApplicationForwarded,
    ) -> Result<(), EvaluatorError> {
        info!(
            application_id = %payload.application_id,
            job_posting_id = %payload.job_posting_id,
            answers = payload.resume_item_answers.len(),
            "forwarding application to evaluator"
        );
        Ok(())
    }

    async fn train_criteria(&self, export: &CriteriaExport) -> Result<(), EvaluatorError> {
        info!(
            job_posting_id = %export.job_posting_id,
            resume_items = export.resume_criteria.len(),
            questions = export.cover_letter_criteria.len(),
            "training evaluator on posting criteria"
        );
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
