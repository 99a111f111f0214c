use std::path::PathBuf;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

use common::api::{ErrorBody, UploadAck};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::filename::validate_upload_filename;

/// Body limit for the upload route: the per-file limit plus an allowance
/// for multipart framing and the version field.
pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_size as usize + 64 * 1024)
}

/// A fully-received `file` field, parked in a temp file outside the store.
struct ReceivedFile {
    original_name: Option<String>,
    content_type: Option<String>,
    temp: PathBuf,
    size: u64,
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Upload",
    operation_id = "uploadMod",
    summary = "Upload a mod archive",
    description = "Accepts a single `file` multipart field plus an optional \
        `targetVersion` (or `version`) text field. The archive is stored under \
        a server-assigned unique name which is returned together with the \
        original filename.",
    request_body(content_type = "multipart/form-data", description = "Archive upload"),
    responses(
        (status = 200, description = "Archive stored", body = UploadAck),
        (status = 400, description = "Missing file or invalid filename", body = ErrorBody),
        (status = 413, description = "Archive exceeds the size limit", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_mod(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadAck>, AppError> {
    let mut file: Option<ReceivedFile> = None;

    let result = async {
        let mut target_version: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some("file") => {
                    if file.is_some() {
                        return Err(AppError::Validation(
                            "Only one file field is allowed".into(),
                        ));
                    }
                    let original_name = field.file_name().map(|s| s.to_string());
                    let content_type = field.content_type().map(|s| s.to_string());
                    let (temp, size) =
                        stream_field_to_temp(field, state.config.storage.max_upload_size).await?;
                    file = Some(ReceivedFile {
                        original_name,
                        content_type,
                        temp,
                        size,
                    });
                }
                Some("targetVersion") | Some("version") => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read version: {e}"))
                    })?;
                    target_version = Some(text);
                }
                _ => {} // Ignore unknown fields.
            }
        }

        let Some(file) = file.as_ref() else {
            return Err(AppError::NoFile);
        };

        store_upload(&state, file, target_version.as_deref()).await
    }
    .await;

    // On success the temp file was moved into the store; on any failure it
    // must not outlive the request.
    if result.is_err() {
        if let Some(file) = &file {
            let _ = tokio::fs::remove_file(&file.temp).await;
        }
    }
    result
}

async fn store_upload(
    state: &AppState,
    file: &ReceivedFile,
    target_version: Option<&str>,
) -> Result<Json<UploadAck>, AppError> {
    if file.size == 0 {
        return Err(AppError::NoFile);
    }

    let original = file
        .original_name
        .as_deref()
        .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
    let original = validate_upload_filename(original)
        .map_err(|e| AppError::Validation(e.message().into()))?;

    let assigned = state.store.assign_name(original);
    let stored = state
        .store
        .persist(&file.temp, &assigned)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

    let content_type = file.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(original)
            .first_or_octet_stream()
            .to_string()
    });

    tracing::info!(
        original,
        assigned = %assigned,
        size = file.size,
        content_type = %content_type,
        target_version,
        path = %stored.display(),
        "stored uploaded archive"
    );

    Ok(Json(UploadAck {
        message: "File uploaded successfully".into(),
        filename: assigned,
        original_name: original.to_string(),
    }))
}

/// Stream a multipart field to a temp file, enforcing the size limit as
/// bytes arrive so an oversized upload is rejected before anything reaches
/// the store.
async fn stream_field_to_temp(
    mut field: axum::extract::multipart::Field<'_>,
    max_size: u64,
) -> Result<(PathBuf, u64), AppError> {
    let temp_path = std::env::temp_dir().join(format!("modrelay-upload-{}", Uuid::new_v4()));

    let mut temp_file = tokio::fs::File::create(&temp_path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    let result: Result<u64, AppError> = async {
        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::PayloadTooLarge);
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

        Ok(total_size)
    }
    .await;

    match result {
        Ok(size) => Ok((temp_path, size)),
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}
