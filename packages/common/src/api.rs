//! Wire models shared between the gateway and the client.
//!
//! Field names follow the JSON protocol as observed on the wire
//! (`originalName`, `diffReport`), so several structs carry serde renames.

use serde::{Deserialize, Serialize};

/// Gateway acknowledgement for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadAck {
    /// Human-readable confirmation.
    #[schema(example = "File uploaded successfully")]
    pub message: String,
    /// Server-assigned unique filename the archive was stored under.
    #[schema(example = "mod_1712345678901.jar")]
    pub filename: String,
    /// Filename the client originally selected.
    #[serde(rename = "originalName")]
    #[schema(example = "my-mod.jar")]
    pub original_name: String,
}

/// Error body returned by the gateway on any failure.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Short generic description. Internal detail never appears here.
    #[schema(example = "No file uploaded")]
    pub error: String,
}

/// Result of a conversion run: entries added, removed, or modified between
/// the uploaded archive and the target version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// One-line rendering shown to the user after a completed conversion.
    pub fn summary(&self) -> String {
        format!(
            "Changes found: added={}, removed={}, modified={}",
            self.added.len(),
            self.removed.len(),
            self.modified.len()
        )
    }
}

/// Payload of `GET /api/logs/version-comparison` on the conversion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonLogs {
    pub success: bool,
    /// Lines of the latest run log, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
    /// Lines of the latest diff report, when one exists.
    #[serde(
        rename = "diffReport",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub diff_report: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonLogs {
    /// Whether the backend produced any comparison data yet.
    pub fn has_data(&self) -> bool {
        self.success && (self.logs.is_some() || self.diff_report.is_some())
    }
}

/// JSON form of the latest diff report (`GET /api/logs/latest-diff`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffDocument {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Millisecond timestamp of the report file, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}
