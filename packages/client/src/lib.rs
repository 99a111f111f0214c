//! Headless upload-convert-poll client for the Modrelay gateway.
//!
//! The workflow is: check the gateway is alive, rename the selected archive
//! to a unique `mod…` name, upload it, then either issue a one-shot
//! conversion request after a short delay or poll the comparison-log
//! endpoint until the backend produced data. [`workflow::Workflow`] drives a
//! full submission; the individual pieces (API calls, renaming, persistence,
//! session state, polling) are usable on their own.

pub mod api;
pub mod config;
pub mod error;
pub mod naming;
pub mod poll;
pub mod session;
pub mod store;
pub mod workflow;

pub use api::{ApiClient, DiffKind, DiffReport, SelectedFile};
pub use config::{PostUploadStrategy, WorkflowConfig};
pub use error::{ClientError, Result};
pub use naming::RenameStrategy;
pub use session::{Phase, Session};
pub use store::{JsonNameStore, MemoryNameStore, NameStore};
pub use workflow::{Workflow, WorkflowOutcome};
