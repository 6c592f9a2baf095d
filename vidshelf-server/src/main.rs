use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidshelf_core::application::AppUnitOfWork;
use vidshelf_core::database::{InMemoryStore, PostgresDatabase, PostgresOptions};
use vidshelf_server::{
    AppState, create_app,
    auth::AuthCrypto,
    infra::config::{Config, DatabaseConfig, ServeArgs},
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "vidshelf-server")]
#[command(about = "Video catalog server: uploads, playback links, engagement, and comments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file_loaded = dotenvy::dotenv().is_ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if env_file_loaded {
        info!("loaded .env file");
    }

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&cli.serve).await,
        None => run_server(&cli.serve).await,
    }
}

async fn connect_postgres(
    url: &str,
    database: &DatabaseConfig,
) -> anyhow::Result<PostgresDatabase> {
    let mut options = PostgresOptions {
        store_timeout: database.store_timeout,
        ..PostgresOptions::default()
    };
    if let Some(max) = database.max_connections {
        options.max_connections = max;
    }

    PostgresDatabase::new(url, options)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = Config::from_args(args).context("failed to load configuration")?;
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;

    let pg = connect_postgres(url, &config.database).await?;
    pg.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: &ServeArgs) -> anyhow::Result<()> {
    let config = Arc::new(Config::from_args(args).context("failed to load configuration")?);

    let unit_of_work = match config.database.url.as_deref() {
        Some(url) => {
            let pg = connect_postgres(url, &config.database).await?;
            pg.migrate().await.context("database migration failed")?;
            let stats = pg.stats();
            info!(
                size = stats.size,
                max = stats.max_size,
                "connected to PostgreSQL"
            );
            AppUnitOfWork::from_postgres(&pg)
        }
        None => {
            warn!("DATABASE_URL is not set; the catalog is kept in memory and lost on exit");
            AppUnitOfWork::in_memory(InMemoryStore::new())
        }
    };

    tokio::fs::create_dir_all(&config.media.upload_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.media.upload_dir.display()
            )
        })?;

    let crypto = AuthCrypto::new(&config.auth.password_pepper)
        .context("failed to initialise password hashing")?;
    let state = AppState::new(Arc::clone(&config), unit_of_work, crypto)?;
    let router = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!(
        "Starting vidshelf server on {} (uploads in {})",
        listener.local_addr()?,
        config.media.upload_dir.display()
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
