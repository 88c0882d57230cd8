//! Periodic re-resolution of posting statuses.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::repository::{RecruitingStore, StoreError};
use super::status::resolve_posting_status;

/// Injectable time source so tests can simulate elapsed time without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Summary of one status sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSweep {
    pub scanned: usize,
    pub updated: usize,
}

/// Re-resolves every posting's status on a single non-reentrant timer.
pub struct PostingStatusScheduler<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> PostingStatusScheduler<S, C>
where
    S: RecruitingStore + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// One full scan. Each posting is independent; a posting whose stored
    /// status already matches is left untouched.
    pub fn run_once(&self) -> Result<StatusSweep, StoreError> {
        let now = self.clock.now();
        let postings = self.store.list_postings()?;
        let scanned = postings.len();
        let mut updated = 0;

        for mut posting in postings {
            let resolved = resolve_posting_status(
                posting.application_start,
                posting.application_end,
                posting.evaluation_end,
                now,
            );
            if resolved == posting.status {
                continue;
            }
            let previous = posting.status;
            posting.status = resolved;
            let (id, title) = (posting.id, posting.title.clone());
            self.store.update_posting(posting)?;
            updated += 1;
            info!(
                %id,
                title = %title,
                from = previous.label(),
                to = resolved.label(),
                "posting status transitioned"
            );
        }

        Ok(StatusSweep { scanned, updated })
    }

    /// Drive [`Self::run_once`] forever on a fixed interval. A single task owns
    /// the timer, so sweeps never overlap; missed ticks are delayed rather than
    /// bursted.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; sweep once at startup, then on
            // every period boundary.
            loop {
                ticker.tick().await;
                match self.run_once() {
                    Ok(sweep) => {
                        info!(sweep.scanned, sweep.updated, "posting status sweep finished")
                    }
                    Err(err) => error!(error = %err, "posting status sweep failed"),
                }
            }
        })
    }
}
