//! Cancellable poll loop over the comparison-log endpoint.
//!
//! The loop fetches immediately, then on a fixed interval. Each successful
//! payload is pushed into an mpsc sink; consecutive fetch failures are
//! counted against a [`FailureBudget`] and exhaust the loop. At most one
//! loop runs per [`Poller`].

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use common::api::ComparisonLogs;
use common::retry::{BudgetDecision, FailureBudget};

use crate::config::{DEFAULT_MAX_RETRIES, DEFAULT_POLL_INTERVAL};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_retries: u8,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Why a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Stopped on request, or because the sink was dropped.
    Stopped,
    /// The consecutive-failure budget ran out.
    Exhausted { attempts: u8 },
}

/// Handle to a single background poll loop.
pub struct Poller {
    task: Option<JoinHandle<PollOutcome>>,
    stop: Option<watch::Sender<bool>>,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new()
    }
}

impl Poller {
    pub fn new() -> Self {
        Self {
            task: None,
            stop: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn the loop. Returns `false` without starting anything when a loop
    /// is already active.
    pub fn start<F, Fut>(
        &mut self,
        config: PollConfig,
        fetch: F,
        sink: mpsc::Sender<ComparisonLogs>,
    ) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<ComparisonLogs>> + Send + 'static,
    {
        if self.is_running() {
            return false;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        self.task = Some(tokio::spawn(run_poll_loop(config, fetch, sink, stop_rx)));
        self.stop = Some(stop_tx);
        true
    }

    /// Signal the loop to stop and wait for it to wind down. Returns the
    /// outcome, or `None` when no loop was ever started.
    pub async fn stop(&mut self) -> Option<PollOutcome> {
        let task = self.task.take()?;
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(true);
        }
        task.await.ok()
    }
}

/// The loop itself, separated from the spawn so tests can drive it directly.
pub async fn run_poll_loop<F, Fut>(
    config: PollConfig,
    mut fetch: F,
    sink: mpsc::Sender<ComparisonLogs>,
    mut stop_rx: watch::Receiver<bool>,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ComparisonLogs>>,
{
    let mut budget = FailureBudget::new(config.max_retries);
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop_rx.changed() => {
                debug!("poll loop stopped");
                return PollOutcome::Stopped;
            }
        }

        match fetch().await {
            Ok(logs) => {
                budget.record_success();
                if sink.send(logs).await.is_err() {
                    // Receiver gone; nobody is listening anymore.
                    return PollOutcome::Stopped;
                }
            }
            Err(e) => {
                warn!(error = %e, "comparison-log fetch failed");
                if let BudgetDecision::Exhausted { failures } = budget.record_failure(&e.to_string())
                {
                    return PollOutcome::Exhausted { attempts: failures };
                }
            }
        }
    }
}
