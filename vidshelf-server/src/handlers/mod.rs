pub mod comments;
pub mod uploads;
pub mod videos;

use std::str::FromStr;

use axum::Json;
use vidshelf_core::CatalogError;
use vidshelf_model::EntryId;
use vidshelf_model::api::ApiResponse;

use crate::infra::errors::AppResult;

/// Liveness probe.
pub async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

/// Entry ids arrive as raw path segments so malformed ones get the JSON error
/// envelope instead of axum's plain-text rejection.
pub(crate) fn parse_entry_id(raw: &str) -> AppResult<EntryId> {
    Ok(EntryId::from_str(raw).map_err(CatalogError::from)?)
}
