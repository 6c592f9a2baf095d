//! Request and response payloads shared by the HTTP server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engagement::EngagementCounter;
use crate::ids::{EntryId, UserId};
use crate::user::UserSummary;

/// Envelope wrapping every JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(error),
            message: None,
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    pub token: String,
    pub user: UserSummary,
}

/// Catalog entry as presented to players, with a playable URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetail {
    pub id: EntryId,
    pub title: String,
    pub video_url: String,
    pub created_at: DateTime<Utc>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementResponse {
    pub entry_id: EntryId,
    pub counter: EngagementCounter,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCommentRequest {
    pub text: String,
}
