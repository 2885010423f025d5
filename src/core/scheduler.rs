//! Fire-and-forget launching of dispatcher runs.
//!
//! The HTTP handler gets control back as soon as a run is spawned. Runs are
//! kept in a `JoinSet` so shutdown can wait for them for a bounded time and
//! abort whatever is still going after that.

use crate::core::dispatcher::BulkDispatcher;
use crate::domain::model::{DispatchReport, GroupedMessages};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Clone)]
pub struct DispatchScheduler {
    dispatcher: Arc<BulkDispatcher>,
    runs: Arc<Mutex<JoinSet<DispatchReport>>>,
}

/// What happened to in-flight runs at shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutdownSummary {
    pub completed: usize,
    /// Runs that ended in a panic while draining.
    pub failed: usize,
    pub abandoned: usize,
}

impl DispatchScheduler {
    pub fn new(dispatcher: Arc<BulkDispatcher>) -> Self {
        Self {
            dispatcher,
            runs: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Starts a dispatcher run in the background. Returns without waiting for it.
    pub async fn schedule(&self, session_id: String, groups: GroupedMessages) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let mut runs = self.runs.lock().await;

        // reap finished runs so the set does not grow without bound
        while let Some(finished) = runs.try_join_next() {
            if let Err(e) = finished {
                warn!(error = %e, "Bulk dispatch task ended abnormally");
            }
        }

        runs.spawn(async move { dispatcher.run(&session_id, groups).await });
    }

    pub async fn in_flight(&self) -> usize {
        self.runs.lock().await.len()
    }

    /// Waits up to `grace` for running dispatches, then aborts the rest.
    pub async fn shutdown(&self, grace: Duration) -> ShutdownSummary {
        let mut runs = std::mem::take(&mut *self.runs.lock().await);
        let mut summary = ShutdownSummary::default();

        if runs.is_empty() {
            return summary;
        }

        info!(in_flight = runs.len(), grace_secs = grace.as_secs(), "Waiting for bulk dispatches");

        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = runs.join_next().await {
                match result {
                    Ok(_) => summary.completed += 1,
                    Err(e) => {
                        summary.failed += 1;
                        warn!(error = %e, "Bulk dispatch task ended abnormally");
                    }
                }
            }
        })
        .await;

        if drained.is_err() {
            summary.abandoned = runs.len();
            runs.abort_all();
            while runs.join_next().await.is_some() {}
            warn!(abandoned = summary.abandoned, "Abandoned unfinished bulk dispatches");
        }

        summary
    }
}
