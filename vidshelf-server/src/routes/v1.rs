use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use vidshelf_model::api_routes::{utils::v1_relative, v1};

use crate::{
    auth::{auth_middleware, handlers as auth_handlers},
    handlers::{comments, uploads, videos},
    infra::app_state::AppState,
};

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoints
        .route(v1_relative(v1::auth::SIGNUP), post(auth_handlers::signup))
        .route(v1_relative(v1::auth::LOGIN), post(auth_handlers::login))
        .merge(create_protected_routes(state))
}

/// Create protected routes that require authentication
fn create_protected_routes(state: AppState) -> Router<AppState> {
    let upload_limit = state.config.upload_body_limit();

    Router::new()
        .route(v1_relative(v1::videos::COLLECTION), get(videos::list_videos))
        .route(
            v1_relative(v1::videos::UPLOAD),
            post(uploads::upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(v1_relative(v1::videos::ITEM), get(videos::get_video))
        .route(
            v1_relative(v1::videos::COMMENTS),
            get(comments::list_comments).post(comments::post_comment),
        )
        .route(
            v1_relative(v1::videos::ENGAGEMENT),
            post(videos::record_engagement),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
