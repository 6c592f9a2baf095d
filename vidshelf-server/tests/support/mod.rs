use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;
use vidshelf_core::application::AppUnitOfWork;
use vidshelf_core::database::InMemoryStore;
use vidshelf_core::scan::settings::default_video_file_extensions_vec;
use vidshelf_model::api_routes;
use vidshelf_server::{
    AppState, create_app,
    auth::AuthCrypto,
    infra::config::{AuthConfig, Config, DatabaseConfig, MediaConfig, ServerConfig},
};

pub const BASE_URL: &str = "http://media.test";

// Code is used by test modules, but not in this scope
#[allow(unused)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub uploads: TempDir,
}

#[allow(unused)]
impl TestApp {
    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.uploads.path().join(name)
    }

    pub fn drop_file(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.upload_path(name), contents).unwrap();
    }

    pub fn upload_dir_listing(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn test_config(upload_dir: PathBuf, max_upload_bytes: u64) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            public_base_url: BASE_URL.into(),
        },
        database: DatabaseConfig {
            url: None,
            max_connections: None,
            store_timeout: Duration::from_secs(5),
        },
        media: MediaConfig {
            upload_dir,
            video_extensions: default_video_file_extensions_vec(),
            max_upload_bytes,
        },
        auth: AuthConfig {
            jwt_secret: "test-jwt-secret".into(),
            jwt_ttl: Duration::from_secs(3600),
            password_pepper: "test-pepper".into(),
        },
        cors_allowed_origins: Vec::new(),
    }
}

#[allow(unused)]
pub fn build_test_app() -> Result<TestApp> {
    build_test_app_with_limit(1024 * 1024)
}

#[allow(unused)]
pub fn build_test_app_with_limit(max_upload_bytes: u64) -> Result<TestApp> {
    let uploads = tempfile::tempdir()?;
    let config = Arc::new(test_config(uploads.path().to_path_buf(), max_upload_bytes));
    let crypto = AuthCrypto::for_tests(&config.auth.password_pepper)?;
    let state = AppState::new(
        config,
        AppUnitOfWork::in_memory(InMemoryStore::new()),
        crypto,
    )?;

    let server =
        TestServer::new(create_app(state.clone())).map_err(|err| anyhow!(err.to_string()))?;
    Ok(TestApp {
        server,
        state,
        uploads,
    })
}

#[allow(unused)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Sign up and return `(user_id, token)`.
#[allow(unused)]
pub async fn signup(server: &TestServer, username: &str) -> (i64, String) {
    let response = server
        .post(api_routes::v1::auth::SIGNUP)
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "Password#123"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    let user_id = body["data"]["user_id"].as_i64().expect("user_id provided");
    let token = body["data"]["token"]
        .as_str()
        .expect("token provided")
        .to_string();
    (user_id, token)
}
