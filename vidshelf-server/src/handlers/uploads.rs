use std::path::{Path, PathBuf};

use axum::{
    Json,
    extract::{
        State,
        multipart::{Field, Multipart, MultipartError},
    },
    http::StatusCode,
};
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;
use vidshelf_core::scan::STAGING_SUFFIX;
use vidshelf_model::api::{ApiResponse, VideoDetail};

use super::videos::video_detail;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

const FILE_FIELD: &str = "video";
const TITLE_FIELD: &str = "title";

/// Upload bytes sitting under their staging name until renamed onto the
/// locator.
#[derive(Debug)]
struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
    locator: String,
}

impl StagedFile {
    async fn publish(&self) -> std::io::Result<()> {
        tokio::fs::rename(&self.staging, &self.target).await
    }

    async fn discard(&self) {
        for path in [&self.staging, &self.target] {
            if let Err(err) = tokio::fs::remove_file(path).await
                && err.kind() != std::io::ErrorKind::NotFound
            {
                warn!("failed to remove {}: {err}", path.display());
            }
        }
    }
}

/// Accept a multipart upload (`video` file part, optional `title` text part),
/// store it in the upload directory, and catalogue it.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<VideoDetail>>)> {
    let mut title = String::new();
    let mut staged: Option<StagedFile> = None;

    let outcome = async {
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some(TITLE_FIELD) => {
                    title = field.text().await.map_err(multipart_error)?;
                }
                Some(FILE_FIELD) if staged.is_none() => {
                    staged = Some(stage_field(&state, field).await?);
                }
                Some(FILE_FIELD) => {
                    return Err(AppError::bad_request("only one video per upload"));
                }
                _ => {}
            }
        }
        Ok::<_, AppError>(())
    }
    .await;

    let Some(file) = staged else {
        outcome?;
        return Err(AppError::bad_request(format!(
            "missing `{FILE_FIELD}` file field"
        )));
    };

    let registered = async {
        outcome?;
        file.publish()
            .await
            .map_err(|err| AppError::internal(format!("failed to store upload: {err}")))?;
        Ok::<_, AppError>(state.catalog.register_upload(&title, &file.locator).await?)
    }
    .await;

    match registered {
        Ok(entry) => {
            info!("stored upload {} as entry {}", entry.locator, entry.id);
            Ok((
                StatusCode::CREATED,
                Json(
                    ApiResponse::success(video_detail(&state, entry))
                        .with_message("Video uploaded successfully".into()),
                ),
            ))
        }
        Err(err) => {
            file.discard().await;
            Err(err)
        }
    }
}

async fn stage_field(state: &AppState, mut field: Field<'_>) -> AppResult<StagedFile> {
    let extension = field
        .file_name()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| AppError::bad_request("uploaded file needs a file name with an extension"))?;

    if !extension.chars().all(|c| c.is_ascii_alphanumeric())
        || !state.uploads.allows_extension(&extension)
    {
        return Err(AppError::bad_request(format!(
            "files of type .{extension} are not accepted"
        )));
    }

    let locator = format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    );
    let target = state.uploads.path_for(&locator);
    let staged = StagedFile {
        staging: state.uploads.path_for(&format!("{locator}{STAGING_SUFFIX}")),
        target,
        locator,
    };

    if let Err(err) = write_field(state, &mut field, &staged.staging).await {
        staged.discard().await;
        return Err(err);
    }
    Ok(staged)
}

async fn write_field(state: &AppState, field: &mut Field<'_>, path: &Path) -> AppResult<()> {
    let limit = state.config.media.max_upload_bytes;
    let io_error =
        |err: std::io::Error| AppError::internal(format!("failed to write upload: {err}"));

    let mut file = tokio::fs::File::create(path).await.map_err(io_error)?;
    let mut written: u64 = 0;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        written += chunk.len() as u64;
        if written > limit {
            return Err(AppError::payload_too_large(format!(
                "upload exceeds {limit} bytes"
            )));
        }
        file.write_all(&chunk).await.map_err(io_error)?;
    }

    if written == 0 {
        return Err(AppError::bad_request("uploaded file is empty"));
    }

    file.flush().await.map_err(io_error)?;
    file.sync_all().await.map_err(io_error)?;
    Ok(())
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::new(err.status(), err.body_text())
}
