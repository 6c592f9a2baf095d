pub mod v1;

use axum::Router;
use vidshelf_model::api_routes;

use crate::infra::app_state::AppState;

/// Create the main API router with all versions
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new().nest(api_routes::v1::PREFIX, v1::create_v1_router(state))
}
