//! Outbound calls to the external evaluator.
//!
//! Submission forwarding is fire-and-forget: a bounded queue with a single
//! worker that retries with backoff and ultimately drops, never surfacing
//! failure to the submitting client. Criteria training at posting creation is
//! the opposite, a synchronous call whose timeout fails the creation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::payload::{ApplicationForwarded, CriteriaExport};

/// Seam to the external evaluator service.
#[async_trait]
pub trait EvaluatorClient: Send + Sync {
    /// Forward a freshly submitted application for later scoring.
    async fn submit_application(&self, payload: &ApplicationForwarded)
        -> Result<(), EvaluatorError>;

    /// Teach the evaluator a posting's grading rubric.
    async fn train_criteria(&self, export: &CriteriaExport) -> Result<(), EvaluatorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("evaluator call timed out")]
    Timeout,
    #[error("evaluator transport failure: {0}")]
    Transport(String),
    #[error("evaluator rejected the request: {0}")]
    Rejected(String),
}

/// Retry/backoff policy for the forwarding worker.
#[derive(Debug, Clone)]
pub struct ForwardingPolicy {
    pub queue_capacity: usize,
    pub call_timeout: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for ForwardingPolicy {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            call_timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

/// Handle for enqueueing submission forwardings. Cheap to clone.
#[derive(Clone)]
pub struct ForwardingQueue {
    tx: mpsc::Sender<ApplicationForwarded>,
}

impl ForwardingQueue {
    /// Spawn the worker task and return the enqueue handle alongside it.
    pub fn spawn<C>(client: Arc<C>, policy: ForwardingPolicy) -> (Self, JoinHandle<()>)
    where
        C: EvaluatorClient + 'static,
    {
        let (tx, rx) = mpsc::channel(policy.queue_capacity.max(1));
        let handle = tokio::spawn(forwarding_worker(client, policy, rx));
        (Self { tx }, handle)
    }

    /// Enqueue without blocking. A full or closed queue is logged and the
    /// payload dropped; submission must never wait on the evaluator.
    pub fn enqueue(&self, payload: ApplicationForwarded) {
        let application_id = payload.application_id;
        match self.tx.try_send(payload) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%application_id, "forwarding queue full, dropping submission forwarding");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%application_id, "forwarding worker gone, dropping submission forwarding");
            }
        }
    }
}

async fn forwarding_worker<C>(
    client: Arc<C>,
    policy: ForwardingPolicy,
    mut rx: mpsc::Receiver<ApplicationForwarded>,
) where
    C: EvaluatorClient,
{
    while let Some(payload) = rx.recv().await {
        let application_id = payload.application_id;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let call = client.submit_application(&payload);
            let outcome = match tokio::time::timeout(policy.call_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(EvaluatorError::Timeout),
            };

            match outcome {
                Ok(()) => {
                    info!(%application_id, attempt, "forwarded submission to evaluator");
                    break;
                }
                Err(err) if attempt < policy.max_attempts => {
                    let delay = policy.backoff_base * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        %application_id,
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "submission forwarding failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    // Fire-and-forget contract: log with enough context for
                    // manual reconciliation, then drop.
                    error!(
                        %application_id,
                        attempts = attempt,
                        error = %err,
                        "submission forwarding exhausted retries, dropping"
                    );
                    break;
                }
            }
        }
    }
}

/// Run a training call under the configured bound, mapping elapsed timeouts to
/// [`EvaluatorError::Timeout`] so posting creation can surface them.
pub async fn train_with_timeout<C>(
    client: &C,
    export: &CriteriaExport,
    timeout: Duration,
) -> Result<(), EvaluatorError>
where
    C: EvaluatorClient + ?Sized,
{
    match tokio::time::timeout(timeout, client.train_criteria(export)).await {
        Ok(result) => result,
        Err(_) => Err(EvaluatorError::Timeout),
    }
}
