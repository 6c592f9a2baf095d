//! HTTP surface of the vidshelf catalog.
//!
//! [`create_app`] assembles the versioned API, static file serving for
//! uploads, and the cross-cutting layers; `main.rs` only loads configuration,
//! picks a store, and binds the listener.

pub mod auth;
pub mod handlers;
pub mod infra;
pub mod routes;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, get_service},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;
use vidshelf_core::scan::STAGING_SUFFIX;
use vidshelf_model::api_routes;

pub use infra::app_state::AppState;

pub fn create_app(state: AppState) -> Router {
    let uploads = get_service(ServeDir::new(state.uploads.root()))
        .layer(middleware::from_fn(hide_unpublished_files));
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .merge(routes::create_api_router(state.clone()))
        .route(api_routes::HEALTH, get(handlers::health))
        .nest_service(api_routes::UPLOADS, uploads)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Uploads still being written and dotfiles share the served directory but
/// are never handed out.
async fn hide_unpublished_files(request: Request, next: Next) -> Response {
    let hidden = request.uri().path().split('/').any(|segment| {
        match urlencoding::decode(segment) {
            Ok(name) => name.starts_with('.') || name.ends_with(STAGING_SUFFIX),
            Err(_) => true,
        }
    });
    if hidden {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::RANGE]);

    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}
