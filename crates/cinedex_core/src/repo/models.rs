//! One record store per kind over a shared pool.

use crate::config::StoreConfig;
use crate::db::{open_pool, DbPool, DbResult};
use crate::model::actor::Actor;
use crate::model::director::Director;
use crate::model::movie::Movie;
use crate::repo::record_store::SqliteRecordStore;

/// Store registry handed to callers.
#[derive(Debug, Clone)]
pub struct Models {
    pub movies: SqliteRecordStore<Movie>,
    pub actors: SqliteRecordStore<Actor>,
    pub directors: SqliteRecordStore<Director>,
}

impl Models {
    /// Builds every store over `pool` with the configured query deadline.
    pub fn new(pool: DbPool, config: &StoreConfig) -> Self {
        let query_timeout = config.query_timeout();
        Self {
            movies: SqliteRecordStore::new(pool.clone(), query_timeout),
            actors: SqliteRecordStore::new(pool.clone(), query_timeout),
            directors: SqliteRecordStore::new(pool, query_timeout),
        }
    }

    /// Opens and migrates the configured database, then builds the stores.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        let pool = open_pool(config)?;
        Ok(Self::new(pool, config))
    }
}
