use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, warn};
use vidshelf_core::database::ports::users::NewUser;
use vidshelf_model::UserRecord;
use vidshelf_model::api::{ApiResponse, AuthResponse, LoginRequest, SignupRequest};

use super::crypto::AuthCrypto;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Create an account and return a token for it.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let username = request.username.trim();
    let email = request.email.trim();
    if username.is_empty() {
        return Err(AppError::bad_request("username is required"));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("a valid email is required"));
    }
    if request.password.is_empty() {
        return Err(AppError::bad_request("password is required"));
    }

    let password_hash = hash_off_thread(Arc::clone(&state.crypto), request.password).await?;
    let user = state
        .catalog
        .users()
        .create_user(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;

    info!("registered user {} ({})", user.id, user.username);
    let response = issue(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(response).with_message("User registered successfully".into())),
    ))
}

/// Exchange email and password for a token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let invalid = || AppError::unauthorized("invalid credentials");

    let user = state
        .catalog
        .users()
        .find_by_email(request.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let crypto = Arc::clone(&state.crypto);
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || {
        crypto.verify_password(&request.password, &stored)
    })
    .await
    .map_err(|err| AppError::internal(format!("password check aborted: {err}")))?
    .map_err(|err| {
        warn!("stored hash for user {} is unreadable: {err}", user.id);
        invalid()
    })?;

    if !verified {
        return Err(invalid());
    }

    Ok(Json(ApiResponse::success(issue(&state, &user)?)))
}

async fn hash_off_thread(crypto: Arc<AuthCrypto>, password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || crypto.hash_password(&password))
        .await
        .map_err(|err| AppError::internal(format!("password hashing aborted: {err}")))?
        .map_err(|err| AppError::internal(err.to_string()))
}

fn issue(state: &AppState, user: &UserRecord) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .issue(user.id)
        .map_err(|err| AppError::internal(err.to_string()))?;
    Ok(AuthResponse {
        user_id: user.id,
        token,
        user: user.summary(),
    })
}
