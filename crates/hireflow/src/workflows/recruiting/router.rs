use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use super::applications::ApplicationService;
use super::dispatch::EvaluatorClient;
use super::domain::{ApplicationId, JobPostingId};
use super::errors::RecruitingError;
use super::payload::{
    CompanyRequest, DecisionRequest, EvaluationPayload, JobPostingRequest, SubmissionRequest,
};
use super::postings::JobPostingService;
use super::reconcile::EvaluationReconciler;
use super::repository::RecruitingStore;
use super::scheduler::Clock;

/// Shared handler state: the three services over one store.
pub struct RecruitingState<S, E, C> {
    pub postings: Arc<JobPostingService<S, E, C>>,
    pub applications: Arc<ApplicationService<S, C>>,
    pub reconciler: Arc<EvaluationReconciler<S, C>>,
}

impl<S, E, C> Clone for RecruitingState<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            postings: self.postings.clone(),
            applications: self.applications.clone(),
            reconciler: self.reconciler.clone(),
        }
    }
}

/// Router exposing the recruiting API surface.
pub fn recruiting_router<S, E, C>(state: RecruitingState<S, E, C>) -> Router
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/company",
            post(register_company::<S, E, C>).get(get_company::<S, E, C>),
        )
        .route(
            "/api/v1/job-postings",
            post(create_posting::<S, E, C>).get(list_postings::<S, E, C>),
        )
        .route(
            "/api/v1/job-postings/:posting_id",
            get(get_posting::<S, E, C>).put(update_posting::<S, E, C>),
        )
        .route(
            "/api/v1/job-postings/:posting_id/evaluation-criteria",
            get(get_criteria::<S, E, C>),
        )
        .route(
            "/api/v1/job-postings/:posting_id/applications",
            post(submit_application::<S, E, C>).get(list_posting_applications::<S, E, C>),
        )
        .route(
            "/api/v1/applications",
            get(list_applications::<S, E, C>),
        )
        .route(
            "/api/v1/applications/statistics",
            get(get_statistics::<S, E, C>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_application::<S, E, C>),
        )
        .route(
            "/api/v1/applications/:application_id/details",
            get(get_application_details::<S, E, C>),
        )
        .route(
            "/api/v1/applications/:application_id/decision",
            put(record_decision::<S, E, C>),
        )
        .route("/api/v1/evaluations", post(ingest_evaluation::<S, E, C>))
        .route(
            "/api/v1/admin/evaluations",
            post(ingest_evaluation_by_id::<S, E, C>),
        )
        .with_state(state)
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, RecruitingError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RecruitingError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (err.status_code(), Json(payload)).into_response()
}

async fn register_company<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Json(request): Json<CompanyRequest>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::CREATED, state.postings.register_company(request))
}

async fn get_company<S, E, C>(State(state): State<RecruitingState<S, E, C>>) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::OK, state.postings.company())
}

async fn create_posting<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Json(request): Json<JobPostingRequest>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::CREATED, state.postings.create(request).await)
}

async fn list_postings<S, E, C>(State(state): State<RecruitingState<S, E, C>>) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::OK, state.postings.list())
}

async fn get_posting<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(posting_id): Path<u64>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::OK, state.postings.get(JobPostingId(posting_id)))
}

async fn update_posting<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(posting_id): Path<u64>,
    Json(request): Json<JobPostingRequest>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state.postings.update(JobPostingId(posting_id), request),
    )
}

async fn get_criteria<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(posting_id): Path<u64>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state.postings.criteria(JobPostingId(posting_id)),
    )
}

async fn submit_application<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(posting_id): Path<u64>,
    Json(request): Json<SubmissionRequest>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::ACCEPTED,
        state
            .applications
            .submit(JobPostingId(posting_id), request),
    )
}

async fn list_posting_applications<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(posting_id): Path<u64>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state
            .applications
            .list_for_posting(JobPostingId(posting_id)),
    )
}

async fn list_applications<S, E, C>(State(state): State<RecruitingState<S, E, C>>) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::OK, state.applications.list())
}

async fn get_application<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(application_id): Path<u64>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state.applications.get(ApplicationId(application_id)),
    )
}

async fn get_application_details<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(application_id): Path<u64>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state.applications.details(ApplicationId(application_id)),
    )
}

async fn record_decision<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Path(application_id): Path<u64>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state.applications.record_decision(
            ApplicationId(application_id),
            request.comment,
            &request.status,
        ),
    )
}

async fn get_statistics<S, E, C>(State(state): State<RecruitingState<S, E, C>>) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::OK, state.applications.statistics())
}

async fn ingest_evaluation<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Json(payload): Json<EvaluationPayload>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(StatusCode::OK, state.reconciler.ingest(payload))
}

async fn ingest_evaluation_by_id<S, E, C>(
    State(state): State<RecruitingState<S, E, C>>,
    Json(payload): Json<EvaluationPayload>,
) -> Response
where
    S: RecruitingStore + 'static,
    E: EvaluatorClient + 'static,
    C: Clock + 'static,
{
    respond(
        StatusCode::OK,
        state.reconciler.ingest_by_application_id(payload),
    )
}
