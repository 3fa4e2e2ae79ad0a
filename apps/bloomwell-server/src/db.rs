use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use runtime::config::{absolutize_sqlite_dsn, detect_backend};
use runtime::{AppConfig, DatabaseConfig};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sea_orm_migration::MigratorTrait;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;

pub const MEMORY_DSN: &str = "sqlite::memory:";

/// Pool settings derived from the `database` config section.
#[derive(Debug, Clone)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    pub sqlite_busy_timeout: Option<Duration>,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            acquire_timeout: Some(Duration::from_secs(5)),
            sqlite_busy_timeout: Some(Duration::from_millis(5_000)),
        }
    }
}

impl From<&DatabaseConfig> for ConnectOpts {
    fn from(cfg: &DatabaseConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_conns: cfg.max_conns.or(defaults.max_conns),
            acquire_timeout: defaults.acquire_timeout,
            sqlite_busy_timeout: cfg
                .busy_timeout_ms
                .map(|ms| Duration::from_millis(u64::from(ms)))
                .or(defaults.sqlite_busy_timeout),
        }
    }
}

/// Resolve the DSN to connect to. `--mock` wins over the config; a missing
/// `database` section falls back to the built-in sqlite file; relative sqlite
/// paths are anchored at `home_dir`.
pub fn resolve_dsn(config: &AppConfig, mock: bool) -> Result<(String, ConnectOpts)> {
    if mock {
        return Ok((MEMORY_DSN.to_string(), ConnectOpts::default()));
    }

    let db_config = config
        .database
        .clone()
        .or_else(|| AppConfig::default().database)
        .ok_or_else(|| anyhow!("Database URL not configured"))?;

    let raw = db_config.url.trim();
    let dsn = match detect_backend(raw)? {
        "sqlite" => absolutize_sqlite_dsn(raw, Path::new(&config.server.home_dir), true)?,
        _ => raw.to_string(),
    };
    Ok((dsn, ConnectOpts::from(&db_config)))
}

/// Open a pooled connection and hand it to SeaORM.
pub async fn connect(dsn: &str, opts: &ConnectOpts) -> Result<DatabaseConnection> {
    match detect_backend(dsn)? {
        "sqlite" => connect_sqlite(dsn, opts).await,
        "postgres" => {
            let mut o = PgPoolOptions::new();
            if let Some(n) = opts.max_conns {
                o = o.max_connections(n);
            }
            if let Some(t) = opts.acquire_timeout {
                o = o.acquire_timeout(t);
            }
            let pool = o.connect(dsn).await.context("connect to postgres")?;
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
        }
        other => Err(anyhow!("Unsupported database type: {other}")),
    }
}

async fn connect_sqlite(dsn: &str, opts: &ConnectOpts) -> Result<DatabaseConnection> {
    let in_memory = dsn.eq_ignore_ascii_case(MEMORY_DSN);
    let mut o = SqlitePoolOptions::new();

    if in_memory {
        // every connection would otherwise see its own empty database
        o = o
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else if let Some(n) = opts.max_conns {
        o = o.max_connections(n);
    }
    if let Some(t) = opts.acquire_timeout {
        o = o.acquire_timeout(t);
    }

    let busy = opts.sqlite_busy_timeout;
    o = o.after_connect(move |conn, _meta| {
        Box::pin(async move {
            if !in_memory {
                sqlx::query("PRAGMA journal_mode = WAL")
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("PRAGMA synchronous = NORMAL")
                    .execute(&mut *conn)
                    .await?;
            }
            sqlx::query("PRAGMA foreign_keys = ON")
                .execute(&mut *conn)
                .await?;
            if let Some(ms) = busy {
                // PRAGMA can't use bind parameters
                let stmt = format!("PRAGMA busy_timeout = {}", ms.as_millis());
                sqlx::query(&stmt).execute(&mut *conn).await?;
            }
            Ok(())
        })
    });

    let pool = o.connect(dsn).await.context("connect to sqlite")?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Apply pending migrations of every module. Each module keeps its own
/// migrations table, so order between modules does not matter.
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    accounts::infra::storage::migrations::Migrator::up(db, None)
        .await
        .context("accounts migrations")?;
    moods::infra::storage::migrations::Migrator::up(db, None)
        .await
        .context("moods migrations")?;
    Ok(())
}
