use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args as ClapArgs;
use vidshelf_core::scan::settings::default_video_file_extensions_vec;

/// 2 GiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Command-line flags, each with an environment fallback.
#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// PostgreSQL connection string; without it the catalog lives in memory
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Upper bound on pooled connections (defaults to the CPU count)
    #[arg(long, env = "DB_MAX_CONNECTIONS")]
    pub db_max_connections: Option<u32>,

    /// Deadline for each store operation, e.g. `5s` or `750ms`
    #[arg(
        long,
        env = "STORE_TIMEOUT",
        default_value = "5s",
        value_parser = humantime::parse_duration
    )]
    pub store_timeout: Duration,

    /// Directory uploads are written to and scanned from
    #[arg(long, env = "UPLOAD_DIR", default_value = "./uploads")]
    pub upload_dir: PathBuf,

    /// Origin used to build playable video URLs
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,

    /// Comma-separated extensions to catalogue; `*` accepts every file
    #[arg(long, env = "VIDEO_EXTENSIONS", value_delimiter = ',')]
    pub video_extensions: Vec<String>,

    /// Comma-separated CORS origins; empty allows any origin
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,

    /// Largest accepted upload body in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: u64,

    /// HS256 signing secret for access tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime, e.g. `1d` or `12h`
    #[arg(long, env = "JWT_TTL", default_value = "1d", value_parser = humantime::parse_duration)]
    pub jwt_ttl: Duration,

    /// Server-side pepper mixed into every password hash
    #[arg(long, env = "AUTH_PASSWORD_PEPPER", hide_env_values = true)]
    pub password_pepper: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub store_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub upload_dir: PathBuf,
    /// Empty means every regular file is catalogued.
    pub video_extensions: Vec<String>,
    pub max_upload_bytes: u64,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub password_pepper: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl", &self.jwt_ttl)
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_args(args: &ServeArgs) -> anyhow::Result<Self> {
        let jwt_secret = required(args.jwt_secret.as_deref(), "JWT_SECRET")?;
        let password_pepper = required(args.password_pepper.as_deref(), "AUTH_PASSWORD_PEPPER")?;

        if args.store_timeout.is_zero() {
            bail!("STORE_TIMEOUT must be greater than zero");
        }
        if args.jwt_ttl.is_zero() {
            bail!("JWT_TTL must be greater than zero");
        }
        if args.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if args.db_max_connections == Some(0) {
            bail!("DB_MAX_CONNECTIONS must be greater than zero");
        }

        let public_base_url = match args.public_base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", args.port),
        };

        let database_url = args
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned);

        Ok(Self {
            server: ServerConfig {
                host: args.host.clone(),
                port: args.port,
                public_base_url,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: args.db_max_connections,
                store_timeout: args.store_timeout,
            },
            media: MediaConfig {
                upload_dir: args.upload_dir.clone(),
                video_extensions: resolve_extensions(&args.video_extensions),
                max_upload_bytes: args.max_upload_bytes,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_ttl: args.jwt_ttl,
                password_pepper,
            },
            cors_allowed_origins: args
                .cors_allowed_origins
                .iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Allowed upload body size as a `usize` for axum's body limit.
    pub fn upload_body_limit(&self) -> usize {
        usize::try_from(self.media.max_upload_bytes).unwrap_or(usize::MAX)
    }
}

fn required(value: Option<&str>, name: &str) -> anyhow::Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
        .with_context(|| format!("{name} must be set"))
}

fn resolve_extensions(configured: &[String]) -> Vec<String> {
    let cleaned: Vec<String> = configured
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    if cleaned.iter().any(|ext| ext == "*") {
        Vec::new()
    } else if cleaned.is_empty() {
        default_video_file_extensions_vec()
    } else {
        cleaned
    }
}
