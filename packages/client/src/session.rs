//! Pure state machine for one submission.
//!
//! The session tracks where a submission currently is and a coarse progress
//! value. Progress only ever moves forward: 0 at selection, 25 when a
//! two-stage (convert) submission starts uploading, 50 once the upload is
//! acknowledged, 100 on completion. Single-stage (poll) submissions skip the
//! 25 checkpoint.

use crate::error::{ClientError, Result};

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
    Uploading,
    Converting,
    Polling,
    Complete,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Failed)
    }
}

/// What follows a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterUpload {
    Convert,
    Poll,
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    progress: u8,
    selected: Option<String>,
    version: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            progress: 0,
            selected: None,
            version: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Pick a file. Replaces any previous selection.
    pub fn select(&mut self, file_name: impl Into<String>) {
        self.phase = Phase::Selected;
        self.progress = 0;
        self.selected = Some(file_name.into());
        self.version = None;
    }

    /// Drop the current selection, back to idle.
    pub fn clear_selection(&mut self) {
        *self = Self::new();
    }

    /// Start a submission. Requires a selected file and a non-empty version.
    pub fn submit(&mut self, version: &str, after: AfterUpload) -> Result<()> {
        if self.phase != Phase::Selected {
            return Err(ClientError::NoFileSelected);
        }
        if version.trim().is_empty() {
            return Err(ClientError::MissingVersion);
        }

        self.version = Some(version.to_string());
        self.phase = Phase::Uploading;
        self.advance_progress(match after {
            AfterUpload::Convert => 25,
            AfterUpload::Poll => 50,
        });
        Ok(())
    }

    /// The gateway acknowledged the upload.
    pub fn upload_succeeded(&mut self, after: AfterUpload) {
        self.phase = match after {
            AfterUpload::Convert => Phase::Converting,
            AfterUpload::Poll => Phase::Polling,
        };
        self.advance_progress(50);
    }

    pub fn complete(&mut self) {
        self.phase = Phase::Complete;
        self.advance_progress(100);
    }

    /// Mark the submission failed. A session with nothing in flight stays
    /// idle.
    pub fn fail(&mut self) {
        if self.phase != Phase::Idle {
            self.phase = Phase::Failed;
        }
    }

    fn advance_progress(&mut self, to: u8) {
        self.progress = self.progress.max(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_path_hits_every_checkpoint() {
        let mut session = Session::new();
        assert_eq!(session.progress(), 0);

        session.select("example.jar");
        assert_eq!(session.phase(), Phase::Selected);
        assert_eq!(session.progress(), 0);

        session.submit("1.20", AfterUpload::Convert).unwrap();
        assert_eq!(session.phase(), Phase::Uploading);
        assert_eq!(session.progress(), 25);

        session.upload_succeeded(AfterUpload::Convert);
        assert_eq!(session.phase(), Phase::Converting);
        assert_eq!(session.progress(), 50);

        session.complete();
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.progress(), 100);
        assert!(session.phase().is_terminal());
    }

    #[test]
    fn poll_path_skips_the_quarter_checkpoint() {
        let mut session = Session::new();
        session.select("example.jar");
        session.submit("1.20", AfterUpload::Poll).unwrap();
        assert_eq!(session.progress(), 50);

        session.upload_succeeded(AfterUpload::Poll);
        assert_eq!(session.phase(), Phase::Polling);
        assert_eq!(session.progress(), 50);

        session.complete();
        assert_eq!(session.progress(), 100);
    }

    #[test]
    fn submit_requires_a_selection() {
        let mut session = Session::new();
        let err = session.submit("1.20", AfterUpload::Convert).unwrap_err();
        assert!(matches!(err, ClientError::NoFileSelected));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn submit_requires_a_version() {
        let mut session = Session::new();
        session.select("example.jar");

        let err = session.submit("  ", AfterUpload::Convert).unwrap_err();
        assert!(matches!(err, ClientError::MissingVersion));
        assert_eq!(session.phase(), Phase::Selected);
    }

    #[test]
    fn failure_is_terminal_and_keeps_progress() {
        let mut session = Session::new();
        session.select("example.jar");
        session.submit("1.20", AfterUpload::Convert).unwrap();

        session.fail();
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.progress(), 25);
    }

    #[test]
    fn failing_an_idle_session_is_a_no_op() {
        let mut session = Session::new();
        session.fail();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn reselecting_resets_progress() {
        let mut session = Session::new();
        session.select("a.jar");
        session.submit("1.20", AfterUpload::Poll).unwrap();
        assert_eq!(session.progress(), 50);

        session.select("b.jar");
        assert_eq!(session.phase(), Phase::Selected);
        assert_eq!(session.progress(), 0);
        assert_eq!(session.selected_file(), Some("b.jar"));
    }
}
