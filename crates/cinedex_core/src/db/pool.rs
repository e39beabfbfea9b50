//! Connection pool bootstrap for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite pools from a [`StoreConfig`].
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable pool.
//!
//! # Invariants
//! - Every pooled connection has `foreign_keys=ON` and a busy timeout.
//! - File databases run in WAL mode so listings do not block on writers.
//! - In-memory pools hold exactly one long-lived connection; each SQLite
//!   in-memory connection is its own database.

use super::migrations::apply_migrations;
use super::{DbError, DbPool, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Opens a pool described by `config` and applies all pending migrations.
///
/// # Side effects
/// - Eagerly opens the configured number of connections.
/// - Emits `db_open` logging events with duration and status.
pub fn open_pool(config: &StoreConfig) -> DbResult<DbPool> {
    let started_at = Instant::now();
    let mode = if config.is_in_memory() { "memory" } else { "file" };
    info!(
        "event=db_open module=db status=start mode={} max_connections={}",
        mode,
        config.effective_max_connections()
    );

    match build_pool(config) {
        Ok(pool) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(pool)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a single-connection in-memory pool with default timeouts.
pub fn open_pool_in_memory() -> DbResult<DbPool> {
    open_pool(&StoreConfig::in_memory())
}

fn build_pool(config: &StoreConfig) -> DbResult<DbPool> {
    config.validate().map_err(DbError::InvalidConfig)?;

    let busy_timeout = config.busy_timeout();
    let builder = Pool::builder()
        .max_size(config.effective_max_connections())
        .connection_timeout(config.connection_timeout());

    let pool = if config.is_in_memory() {
        let manager = SqliteConnectionManager::memory()
            .with_init(move |conn| configure_connection(conn, busy_timeout, false));
        builder
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?
    } else {
        let manager = SqliteConnectionManager::file(&config.database)
            .with_init(move |conn| configure_connection(conn, busy_timeout, true));
        builder.build(manager)?
    };

    let mut conn = pool.get()?;
    apply_migrations(&mut conn)?;
    Ok(pool)
}

fn configure_connection(
    conn: &mut Connection,
    busy_timeout: Duration,
    write_ahead_log: bool,
) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    if write_ahead_log {
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    }
    Ok(())
}
