//! HTTP client for the gateway and the conversion backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_DISPOSITION;
use tracing::{debug, error, instrument};

use common::api::{ComparisonLogs, DiffDocument, DiffSummary, UploadAck};

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Which downloadable diff artifact to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// The latest overall comparison report.
    Latest,
    /// The report scoped to the uploaded archive.
    ModFile,
}

impl DiffKind {
    fn path(self) -> &'static str {
        match self {
            DiffKind::Latest => "/api/logs/download-diff",
            DiffKind::ModFile => "/api/logs/mod-file-diff",
        }
    }

    /// Filename used when the response carries no usable
    /// `Content-Disposition` header.
    fn default_filename(self) -> &'static str {
        match self {
            DiffKind::Latest => "diff_report.txt",
            DiffKind::ModFile => "mod_diff_report.txt",
        }
    }
}

/// A file picked for upload, fully read into memory.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(ClientError::NoFileSelected)?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path).first().map(|m| m.to_string());

        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A downloaded diff report, ready to be saved.
#[derive(Debug, Clone)]
pub struct DiffReport {
    /// Name suggested by the server, or the per-kind fallback.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DiffReport {
    /// Write the report into `dir` under its suggested filename. The bytes
    /// go to a temp file first and are renamed into place, so an interrupted
    /// write never leaves a partial report behind.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;

        let target = dir.join(&self.filename);
        let temp = dir.join(format!(".{}.{}.part", self.filename, uuid::Uuid::new_v4()));
        tokio::fs::write(&temp, &self.bytes).await?;
        match tokio::fs::rename(&temp, &target).await {
            Ok(()) => Ok(target),
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp).await;
                Err(e.into())
            }
        }
    }
}

/// Thin typed wrapper over the gateway's HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness gate. `Ok` only when the gateway answers 2xx.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<()> {
        let res = self.client.get(self.url("/api/health")).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::GatewayUnavailable(status.as_u16()));
        }
        Ok(())
    }

    /// Upload the archive under its assigned name.
    #[instrument(skip(self, file), fields(assigned = assigned_name, size = file.size()))]
    pub async fn upload(
        &self,
        file: &SelectedFile,
        assigned_name: &str,
        version: &str,
    ) -> Result<UploadAck> {
        let mut part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(assigned_name.to_string());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("targetVersion", version.to_string());

        let res = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body, "upload rejected");
            return Err(ClientError::UploadFailed(status.as_u16()));
        }

        Ok(res.json().await?)
    }

    /// One-shot conversion of the most recently uploaded archive.
    #[instrument(skip(self))]
    pub async fn convert(&self, version: &str) -> Result<DiffSummary> {
        let res = self
            .client
            .post(self.url("/api/convert"))
            .json(&serde_json::json!({ "version": version }))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::ConversionFailed(status.as_u16()));
        }

        Ok(res.json().await?)
    }

    /// Current run log and diff report, if the backend produced any yet.
    pub async fn comparison_logs(&self) -> Result<ComparisonLogs> {
        let res = self
            .client
            .get(self.url("/api/logs/version-comparison"))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::DownloadFailed(status.as_u16()));
        }

        Ok(res.json().await?)
    }

    /// The newest diff report as a JSON document.
    pub async fn latest_diff(&self) -> Result<DiffDocument> {
        let res = self
            .client
            .get(self.url("/api/logs/latest-diff"))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::DownloadFailed(status.as_u16()));
        }

        Ok(res.json().await?)
    }

    /// Download a diff report as raw bytes, taking the filename from the
    /// `Content-Disposition` header when present.
    #[instrument(skip(self))]
    pub async fn download_diff(&self, kind: DiffKind) -> Result<DiffReport> {
        let res = self.client.get(self.url(kind.path())).send().await?;
        let status = res.status();
        if !status.is_success() {
            error!(status = status.as_u16(), ?kind, "diff download rejected");
            return Err(ClientError::DownloadFailed(status.as_u16()));
        }

        let filename = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| kind.default_filename().to_string());
        let bytes = res.bytes().await?.to_vec();
        debug!(filename, size = bytes.len(), "diff report downloaded");

        Ok(DiffReport { filename, bytes })
    }
}

/// `filename=` parameter of a `Content-Disposition` value.
fn disposition_filename(value: &str) -> Option<String> {
    let (_, rest) = value.split_once("filename=")?;
    let name = rest
        .split(';')
        .next()
        .unwrap_or(rest)
        .trim()
        .trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
