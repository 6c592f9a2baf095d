use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use vidshelf_model::Comment;
use vidshelf_model::api::{ApiResponse, PostCommentRequest};

use super::parse_entry_id;
use crate::auth::AuthenticatedUser;
use crate::infra::{app_state::AppState, errors::AppResult};

/// Comment on an entry as the authenticated caller.
pub async fn post_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<PostCommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Comment>>)> {
    let entry_id = parse_entry_id(&id)?;
    let comment = state
        .catalog
        .post_comment(entry_id, user.id, &request.text)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Comment>>>> {
    let entry_id = parse_entry_id(&id)?;
    let comments = state.catalog.list_comments(entry_id).await?;
    Ok(Json(ApiResponse::success(comments)))
}
