//! Store configuration.
//!
//! # Responsibility
//! - Describe where the database lives and how the pool is sized.
//! - Carry the per-statement deadline applied by every record store.
//!
//! # Invariants
//! - Timeouts and pool size are strictly positive once validated.
//! - In-memory databases always use a single pooled connection.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Database value selecting a private in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

const DEFAULT_DATABASE: &str = "cinedex.sqlite3";
const DEFAULT_MAX_CONNECTIONS: u32 = 16;
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 3_000;

/// Connection and deadline settings for the record stores.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file path, or [`IN_MEMORY_DATABASE`].
    pub database: String,
    /// Maximum pool size. Ignored for in-memory databases.
    pub max_connections: u32,
    /// How long a caller may wait for a pooled connection.
    pub connection_timeout_ms: u64,
    /// Execution deadline applied to every store statement.
    pub query_timeout_ms: u64,
    /// How long a statement waits on another writer's lock.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Default settings pointed at a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            database: IN_MEMORY_DATABASE.to_string(),
            ..Self::default()
        }
    }

    /// Default settings pointed at a database file.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            database: path.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from `CINEDEX_DB_*` environment variables.
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database: std::env::var("CINEDEX_DB_PATH").unwrap_or(defaults.database),
            max_connections: env_number("CINEDEX_DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            connection_timeout_ms: env_number("CINEDEX_DB_CONNECTION_TIMEOUT_MS")
                .unwrap_or(defaults.connection_timeout_ms),
            query_timeout_ms: env_number("CINEDEX_DB_QUERY_TIMEOUT_MS")
                .unwrap_or(defaults.query_timeout_ms),
            busy_timeout_ms: env_number("CINEDEX_DB_BUSY_TIMEOUT_MS")
                .unwrap_or(defaults.busy_timeout_ms),
        }
    }

    /// Rejects settings the pool cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.database.trim().is_empty() {
            return Err("database cannot be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("max_connections must be greater than zero".to_string());
        }
        for (name, value) in [
            ("connection_timeout_ms", self.connection_timeout_ms),
            ("query_timeout_ms", self.query_timeout_ms),
            ("busy_timeout_ms", self.busy_timeout_ms),
        ] {
            if value == 0 {
                return Err(format!("{name} must be greater than zero"));
            }
        }
        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY_DATABASE
    }

    /// Pool size actually used, accounting for in-memory databases.
    pub fn effective_max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}
