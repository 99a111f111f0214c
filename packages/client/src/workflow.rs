//! End-to-end submission driver.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use common::api::{ComparisonLogs, DiffSummary};

use crate::api::{ApiClient, SelectedFile};
use crate::config::{PostUploadStrategy, WorkflowConfig};
use crate::error::{ClientError, Result};
use crate::naming::assign_upload_name;
use crate::poll::{PollConfig, PollOutcome, Poller};
use crate::session::{AfterUpload, Session};
use crate::store::NameStore;

/// What a completed submission produced.
#[derive(Debug)]
pub enum WorkflowOutcome {
    /// One-shot conversion path.
    Converted(DiffSummary),
    /// Polling path: the first payload with comparison data.
    Logs(ComparisonLogs),
}

impl WorkflowOutcome {
    /// One-line rendering for a status display.
    pub fn render(&self) -> String {
        match self {
            WorkflowOutcome::Converted(diff) => diff.summary(),
            WorkflowOutcome::Logs(logs) => format!(
                "Comparison log received ({} lines)",
                logs.logs.as_deref().map_or(0, |lines| lines.len())
            ),
        }
    }
}

/// Drives one submission end to end: health gate, rename, upload, then the
/// configured post-upload strategy.
pub struct Workflow<S: NameStore> {
    api: ApiClient,
    names: S,
    config: WorkflowConfig,
    session: Session,
}

impl<S: NameStore> Workflow<S> {
    pub fn new(api: ApiClient, names: S, config: WorkflowConfig) -> Self {
        Self {
            api,
            names,
            config,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn name_store(&self) -> &S {
        &self.names
    }

    pub fn into_name_store(self) -> S {
        self.names
    }

    #[instrument(skip(self, file), fields(file = %file.name, version))]
    pub async fn run(&mut self, file: SelectedFile, version: &str) -> Result<WorkflowOutcome> {
        let result = self.drive(&file, version).await;
        match &result {
            Ok(outcome) => info!(outcome = %outcome.render(), "submission complete"),
            Err(e) => {
                error!(error = %e, user_message = e.user_message(), "submission failed");
                self.session.fail();
            }
        }
        result
    }

    async fn drive(&mut self, file: &SelectedFile, version: &str) -> Result<WorkflowOutcome> {
        // Never start an upload against a dead gateway.
        self.api.health().await?;

        self.session.select(file.name.clone());
        let assigned = match assign_upload_name(
            &mut self.names,
            self.config.rename,
            &self.config.allowed_extensions,
            &file.name,
        ) {
            Ok(assigned) => assigned,
            Err(e) => {
                self.session.clear_selection();
                return Err(e);
            }
        };

        let after = match self.config.post_upload {
            PostUploadStrategy::ConvertAfterDelay { .. } => AfterUpload::Convert,
            PostUploadStrategy::Poll { .. } => AfterUpload::Poll,
        };
        self.session.submit(version, after)?;

        let ack = self.api.upload(file, &assigned, version).await?;
        info!(
            assigned = %ack.filename,
            original = %file.name,
            "upload acknowledged"
        );
        self.session.upload_succeeded(after);

        match self.config.post_upload {
            PostUploadStrategy::ConvertAfterDelay { delay } => {
                // Give the backend time to unpack before the one-shot convert.
                tokio::time::sleep(delay).await;
                let diff = self.api.convert(version).await?;
                self.session.complete();
                Ok(WorkflowOutcome::Converted(diff))
            }
            PostUploadStrategy::Poll {
                interval,
                max_retries,
            } => {
                let logs = self.poll_for_logs(interval, max_retries).await?;
                self.session.complete();
                Ok(WorkflowOutcome::Logs(logs))
            }
        }
    }

    /// Run the poll loop until the backend produces comparison data, the
    /// failure budget runs out, or the loop dies.
    async fn poll_for_logs(&mut self, interval: Duration, max_retries: u8) -> Result<ComparisonLogs> {
        let (tx, mut rx) = mpsc::channel(8);
        let api = self.api.clone();
        let mut poller = Poller::new();
        poller.start(
            PollConfig {
                interval,
                max_retries,
            },
            move || {
                let api = api.clone();
                async move { api.comparison_logs().await }
            },
            tx,
        );

        while let Some(logs) = rx.recv().await {
            if logs.has_data() {
                let _ = poller.stop().await;
                return Ok(logs);
            }
            // Backend is up but has not produced a report yet; keep polling.
        }

        match poller.stop().await {
            Some(PollOutcome::Exhausted { attempts }) => {
                Err(ClientError::PollExhausted { attempts })
            }
            _ => Err(ClientError::PollExhausted {
                attempts: max_retries,
            }),
        }
    }
}
