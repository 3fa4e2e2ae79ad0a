use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use apikit::{IngressOptions, StaticMount};
use authn::{JwtTokens, TokenVerifier};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;

mod db;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MB: u64 = 1024 * 1024;

/// Bloomwell Server - reproductive-health companion API
#[derive(Parser)]
#[command(name = "bloomwell-server")]
#[command(about = "Bloomwell Server - reproductive-health companion API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized (absolute, created) inside the loader
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!(home_dir = %config.server.home_dir, "Bloomwell Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config, &args),
        Commands::Migrate => migrate_only(&config, &args).await,
    }
}

async fn open_database(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let (dsn, opts) = db::resolve_dsn(config, args.mock)?;
    let backend = runtime::config::detect_backend(&dsn)?;
    tracing::info!(backend, mock = args.mock, "Connecting to database");
    let conn = db::connect(&dsn, &opts).await?;
    db::migrate(&conn).await?;
    tracing::info!("Database schema is up to date");
    Ok(conn)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    config.validate_for_serving()?;

    let conn = open_database(&config, &args).await?;
    let app = build_app(&config, conn)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind address {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = apikit::shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "shutdown signal handler failed");
            }
        })
        .await
        .context("HTTP server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

fn mb_to_bytes(mb: u64) -> Option<u64> {
    mb.checked_mul(MB)
}

/// Wire module services onto one connection and mount them behind the ingress.
fn build_app(config: &AppConfig, conn: DatabaseConnection) -> Result<Router> {
    let ttl = chrono::Duration::hours(i64::from(config.auth.token_ttl_hours));
    let tokens = Arc::new(JwtTokens::new(config.auth.jwt_secret.as_bytes(), ttl));
    let verifier: Arc<dyn TokenVerifier> = tokens.clone();

    let uploads_dir = config.uploads_dir();
    std::fs::create_dir_all(&uploads_dir)
        .with_context(|| format!("create uploads directory {}", uploads_dir.display()))?;

    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        Arc::new(accounts::infra::storage::SeaOrmUsersRepository::new(
            conn.clone(),
        )),
        Arc::new(accounts::infra::security::Argon2Hasher),
        Arc::new(accounts::infra::files::LocalDiskFileStore::new(
            uploads_dir.clone(),
        )),
        tokens,
        accounts::domain::service::ServiceConfig {
            public_base_url: config.public_base_url(),
            url_prefix: config.uploads.url_prefix.clone(),
            max_upload_bytes: mb_to_bytes(config.uploads.max_file_size_mb)
                .context("uploads.max_file_size_mb is too large")?,
            ..Default::default()
        },
    ));

    let moods_service = Arc::new(moods::domain::service::Service::new(
        Arc::new(moods::infra::storage::SeaOrmMoodsRepository::new(conn)),
        moods::domain::service::ServiceConfig::default(),
    ));

    let api = Router::new()
        .merge(accounts::api::rest::routes::router(
            accounts_service,
            verifier.clone(),
        ))
        .merge(moods::api::rest::routes::router(moods_service, verifier));

    let openapi = apikit::openapi::assemble(
        "Bloomwell API",
        env!("CARGO_PKG_VERSION"),
        [
            accounts::api::rest::openapi::AccountsApi::openapi(),
            moods::api::rest::openapi::MoodsApi::openapi(),
        ],
    );

    let opts = IngressOptions {
        cors_origins: config.cors.allowed_origins.clone(),
        timeout: Duration::from_secs(config.server.timeout_sec),
        body_limit_bytes: mb_to_bytes(config.server.body_limit_mb)
            .and_then(|n| usize::try_from(n).ok())
            .context("server.body_limit_mb is too large")?,
        static_files: Some(StaticMount {
            url_prefix: config.uploads.url_prefix.clone(),
            dir: uploads_dir,
        }),
    };

    apikit::build_router(api, openapi, &opts)
}

fn check_config(config: &AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let (dsn, _) = db::resolve_dsn(config, args.mock)?;
    if let Err(e) = config.validate_for_serving() {
        // `run` refuses to start with this; `check` only reports it
        println!("warning: {e}");
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Database backend: {}", runtime::config::detect_backend(&dsn)?);
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn migrate_only(config: &AppConfig, args: &CliArgs) -> Result<()> {
    open_database(config, args).await?;
    println!("Migrations applied");
    Ok(())
}
