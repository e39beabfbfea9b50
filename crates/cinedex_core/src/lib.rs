//! Core storage layer for the Cinedex movie catalog.
//! Records, listings and every persistence invariant live here.

pub mod config;
pub mod db;
pub mod filters;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod validation;

pub use config::StoreConfig;
pub use db::{open_pool, open_pool_in_memory, DbError, DbPool, DbResult};
pub use filters::{Filters, SortDirection, SortKey};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::actor::Actor;
pub use model::director::Director;
pub use model::movie::Movie;
pub use pagination::{calculate_metadata, Metadata};
pub use repo::{
    ErrorKind, ListCriteria, Listing, Models, RecordRepository, RepoError, RepoResult,
    SqliteRecordStore, ACTOR_SORT_SAFELIST, DIRECTOR_SORT_SAFELIST, MOVIE_SORT_SAFELIST,
};
pub use validation::ValidationError;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn core_version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
