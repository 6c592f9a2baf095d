use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;
use vidshelf_core::CatalogError;
use vidshelf_model::api::{ApiResponse, EngagementResponse, VideoDetail};
use vidshelf_model::{CatalogEntry, EngagementCounter};

use super::parse_entry_id;
use crate::infra::{app_state::AppState, errors::AppResult};

pub(crate) fn video_detail(state: &AppState, entry: CatalogEntry) -> VideoDetail {
    VideoDetail {
        video_url: state.video_url(&entry.locator),
        id: entry.id,
        title: entry.title,
        created_at: entry.created_at,
        views: entry.views,
        likes: entry.likes,
        dislikes: entry.dislikes,
    }
}

/// Pick up any files dropped into the upload directory, then list the whole
/// catalog in id order.
pub async fn list_videos(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<VideoDetail>>>> {
    let (entries, report) = state.catalog.reconcile_with_report().await?;
    debug!(
        scanned = report.scanned,
        discovered = report.discovered,
        "listed {} videos",
        entries.len()
    );

    let videos = entries
        .into_iter()
        .map(|entry| video_detail(&state, entry))
        .collect();
    Ok(Json(ApiResponse::success(videos)))
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<VideoDetail>>> {
    let id = parse_entry_id(&id)?;
    let entry = state.catalog.get_entry(id).await?;
    Ok(Json(ApiResponse::success(video_detail(&state, entry))))
}

/// `POST /videos/{id}/{view|like|dislike}`. Plural counter names are accepted
/// too.
pub async fn record_engagement(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<EngagementResponse>>> {
    let entry_id = parse_entry_id(&id)?;
    let counter = EngagementCounter::from_str(&action).map_err(CatalogError::from)?;

    let count = state.catalog.increment(entry_id, counter).await?;
    Ok(Json(ApiResponse::success(EngagementResponse {
        entry_id,
        counter,
        count,
    })))
}
