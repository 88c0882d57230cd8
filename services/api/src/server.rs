use crate::cli::ServeArgs;
use crate::infra::{AppState, LoggingEvaluatorClient};
use crate::routes::with_recruiting_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::telemetry;
use hireflow::workflows::recruiting::{
    ApplicationService, EvaluationReconciler, ForwardingPolicy, ForwardingQueue,
    InMemoryRecruitingStore, JobPostingService, PostingStatusScheduler, RecruitingState,
    SystemClock,
};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryRecruitingStore::new());
    let clock = Arc::new(SystemClock);
    let evaluator = Arc::new(LoggingEvaluatorClient);

    let forwarding_policy = ForwardingPolicy {
        queue_capacity: config.evaluator.forward_queue_capacity,
        call_timeout: config.evaluator.forward_timeout,
        max_attempts: config.evaluator.forward_max_attempts,
        backoff_base: config.evaluator.forward_backoff,
    };
    let (forwarding, _forwarding_worker) = ForwardingQueue::spawn(evaluator.clone(), forwarding_policy);

    let recruiting_state = RecruitingState {
        postings: Arc::new(JobPostingService::new(
            store.clone(),
            evaluator,
            clock.clone(),
            config.evaluator.train_timeout,
        )),
        applications: Arc::new(ApplicationService::new(
            store.clone(),
            clock.clone(),
            forwarding,
        )),
        reconciler: Arc::new(EvaluationReconciler::new(store.clone(), clock.clone())),
    };

    let scheduler = Arc::new(PostingStatusScheduler::new(store, clock));
    let _sweep_worker = scheduler.spawn(config.scheduler.sweep_interval);

    let app = with_recruiting_routes(recruiting_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruiting platform ready");

    axum::serve(listener, app).await?;
    Ok(())
}
