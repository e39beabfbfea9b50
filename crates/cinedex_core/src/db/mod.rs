//! SQLite storage bootstrap, pooling and schema migration entry points.
//!
//! # Responsibility
//! - Build the shared connection pool every record store is constructed with.
//! - Apply schema migrations in deterministic order before the pool is used.
//! - Bound statement execution time on pooled connections.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Stores never see a pool whose migrations have not succeeded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod deadline;
pub mod migrations;
mod pool;

pub use deadline::DeadlineGuard;
pub use pool::{open_pool, open_pool_in_memory};

/// Shared, thread-safe pool of configured SQLite connections.
pub type DbPool = r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Pool(r2d2::Error),
    InvalidConfig(String),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Pool(err) => write!(f, "connection pool error: {err}"),
            Self::InvalidConfig(message) => write!(f, "invalid store config: {message}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Pool(err) => Some(err),
            Self::InvalidConfig(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<r2d2::Error> for DbError {
    fn from(value: r2d2::Error) -> Self {
        Self::Pool(value)
    }
}
