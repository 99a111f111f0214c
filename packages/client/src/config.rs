//! Knobs for a submission run.

use std::time::Duration;

use crate::naming::RenameStrategy;

pub const DEFAULT_CONVERT_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// What happens after a successful upload.
#[derive(Debug, Clone)]
pub enum PostUploadStrategy {
    /// Wait a fixed delay for the backend to unpack the archive, then issue
    /// exactly one conversion request.
    ConvertAfterDelay { delay: Duration },
    /// Poll the comparison-log endpoint until the backend produced data.
    Poll { interval: Duration, max_retries: u8 },
}

impl PostUploadStrategy {
    pub fn convert() -> Self {
        Self::ConvertAfterDelay {
            delay: DEFAULT_CONVERT_DELAY,
        }
    }

    pub fn poll() -> Self {
        Self::Poll {
            interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub rename: RenameStrategy,
    pub post_upload: PostUploadStrategy,
    /// Lower-case extensions accepted at selection time.
    pub allowed_extensions: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            rename: RenameStrategy::Counter,
            post_upload: PostUploadStrategy::convert(),
            allowed_extensions: vec!["jar".to_string()],
        }
    }
}
