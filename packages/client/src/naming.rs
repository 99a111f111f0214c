//! Deterministic renaming of selected archives.
//!
//! Every submission goes to the gateway under a fresh `mod…` name so repeated
//! uploads of the same archive never collide. The original filename is kept
//! in the [`NameStore`] so reports can be traced back to what the user
//! actually picked.

use crate::error::{ClientError, Result};
use crate::store::NameStore;

/// How the assigned name is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStrategy {
    /// `mod<N>.<ext>` from the persisted counter, starting at 1.
    Counter,
    /// `mod<millis>.<ext>` from the submission time.
    Timestamp,
}

/// Validate the extension, derive the assigned name, and record the
/// assigned-to-original mapping. The counter is only advanced when the file
/// is accepted.
pub fn assign_upload_name(
    store: &mut dyn NameStore,
    strategy: RenameStrategy,
    allowed_extensions: &[String],
    original: &str,
) -> Result<String> {
    let ext = extension(original)
        .ok_or_else(|| ClientError::InvalidFileType(String::new()))?
        .to_ascii_lowercase();
    if !allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) {
        return Err(ClientError::InvalidFileType(ext));
    }

    let assigned = match strategy {
        RenameStrategy::Counter => {
            let next = store.counter()?.saturating_add(1);
            store.set_counter(next)?;
            format!("mod{next}.{ext}")
        }
        RenameStrategy::Timestamp => {
            format!("mod{}.{ext}", chrono::Utc::now().timestamp_millis())
        }
    };

    store.record_mapping(&assigned, original)?;
    Ok(assigned)
}

fn extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
