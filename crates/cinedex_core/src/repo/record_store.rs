//! Generic record store over the shared SQLite pool.
//!
//! # Responsibility
//! - Provide get/list/insert/update/delete for any [`Record`] kind.
//! - Apply the per-statement deadline and error normalization uniformly.
//!
//! # Invariants
//! - Identities below 1 are rejected before a connection is checked out.
//! - Filters and records are validated before any SQL runs.
//! - Updates are conditioned on the version the caller read; nothing is
//!   locked and nothing is retried.
//! - A store holds no mutable state besides the pool handle.

use crate::db::{DbPool, DeadlineGuard};
use crate::filters::Filters;
use crate::pagination::calculate_metadata;
use crate::repo::error::{Operation, OperationContext, RepoResult};
use crate::repo::query;
use crate::repo::schema::{ListCriteria, Listing, Record};
use rusqlite::types::Value;
use rusqlite::{named_params, params_from_iter, Connection};
use std::marker::PhantomData;
use std::time::Duration;

/// Repository interface shared by every record kind.
pub trait RecordRepository<R: Record> {
    /// Loads one record by identity.
    fn get(&self, id: i64) -> RepoResult<R>;
    /// Lists one page of records matching `criteria`.
    fn get_all(&self, criteria: &ListCriteria, filters: &Filters) -> RepoResult<Listing<R>>;
    /// Persists a new record and writes its generated fields back.
    fn insert(&self, record: &mut R) -> RepoResult<()>;
    /// Persists changed fields if the stored version still matches.
    fn update(&self, record: &mut R) -> RepoResult<()>;
    /// Removes one record by identity.
    fn delete(&self, id: i64) -> RepoResult<()>;
}

/// SQLite-backed store for one record kind.
pub struct SqliteRecordStore<R> {
    pool: DbPool,
    query_timeout: Duration,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqliteRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            query_timeout: self.query_timeout,
            _record: PhantomData,
        }
    }
}

impl<R: Record> SqliteRecordStore<R> {
    /// Creates a store over an already migrated pool.
    pub fn new(pool: DbPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
            _record: PhantomData,
        }
    }

    fn context(&self, operation: Operation, id: i64) -> OperationContext {
        OperationContext::new(R::SCHEMA.resource, operation, id, self.query_timeout)
    }

    /// Runs `work` on a pooled connection with the deadline armed.
    ///
    /// r2d2 only fails a checkout once its connection timeout has elapsed.
    fn with_connection<T>(
        &self,
        call: &OperationContext,
        work: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = self
            .pool
            .get()
            .map_err(|_| call.checkout_timed_out(self.pool.connection_timeout()))?;
        let _deadline = DeadlineGuard::arm(&conn, self.query_timeout);
        work(&conn)
    }

    fn load(&self, call: &OperationContext, id: i64) -> RepoResult<R> {
        if id < 1 {
            return Err(call.not_found());
        }

        let sql = query::select_by_id_sql(R::SCHEMA);
        self.with_connection(call, |conn| {
            let mut stmt = conn.prepare_cached(&sql).map_err(|err| call.normalize(err))?;
            let mut rows = stmt
                .query(named_params! { ":id": id })
                .map_err(|err| call.normalize(err))?;
            let record = match rows.next().map_err(|err| call.normalize(err))? {
                Some(row) => R::from_row(row)?,
                None => return Err(call.not_found()),
            };
            Ok(record)
        })
    }

    fn list(
        &self,
        call: &OperationContext,
        criteria: &ListCriteria,
        filters: &Filters,
    ) -> RepoResult<Listing<R>> {
        let sort = filters.validate()?;
        let Some(list_query) = query::build_list_query(R::SCHEMA, criteria, filters, sort)? else {
            return Ok(Listing::empty());
        };

        self.with_connection(call, |conn| {
            let mut stmt = conn
                .prepare_cached(&list_query.sql)
                .map_err(|err| call.normalize(err))?;
            let params = list_query.params();
            let mut rows = stmt
                .query(params.as_slice())
                .map_err(|err| call.normalize(err))?;

            let mut total_records = 0_i64;
            let mut records = Vec::new();
            while let Some(row) = rows.next().map_err(|err| call.normalize(err))? {
                if records.is_empty() {
                    total_records = row
                        .get("total_records")
                        .map_err(|err| call.normalize(err))?;
                }
                records.push(R::from_row(row)?);
            }

            Ok(Listing {
                records,
                metadata: calculate_metadata(total_records, filters.page, filters.page_size),
            })
        })
    }

    fn create(&self, call: &OperationContext, record: &mut R) -> RepoResult<()> {
        record.validate()?;
        let values = record.write_values()?;

        let sql = query::insert_sql(R::SCHEMA);
        self.with_connection(call, |conn| {
            conn.prepare_cached(&sql)
                .and_then(|mut stmt| {
                    stmt.query_row(params_from_iter(values), |row| record.apply_generated(row))
                })
                .map_err(|err| call.normalize(err))
        })
    }

    fn store(&self, call: &OperationContext, record: &mut R) -> RepoResult<()> {
        if record.id() < 1 {
            return Err(call.not_found());
        }
        record.validate()?;

        let mut values = record.write_values()?;
        values.push(Value::Integer(record.id()));
        values.push(Value::Integer(i64::from(record.version())));

        let sql = query::update_sql(R::SCHEMA);
        let version = self.with_connection(call, |conn| {
            conn.prepare_cached(&sql)
                .and_then(|mut stmt| {
                    stmt.query_row(params_from_iter(values), |row| row.get::<_, i32>("version"))
                })
                .map_err(|err| call.normalize(err))
        })?;

        record.set_version(version);
        Ok(())
    }

    fn remove(&self, call: &OperationContext, id: i64) -> RepoResult<()> {
        if id < 1 {
            return Err(call.not_found());
        }

        let sql = query::delete_sql(R::SCHEMA);
        let changed = self.with_connection(call, |conn| {
            conn.prepare_cached(&sql)
                .and_then(|mut stmt| stmt.execute(named_params! { ":id": id }))
                .map_err(|err| call.normalize(err))
        })?;

        if changed == 0 {
            return Err(call.not_found());
        }

        Ok(())
    }
}

impl<R: Record> RecordRepository<R> for SqliteRecordStore<R> {
    fn get(&self, id: i64) -> RepoResult<R> {
        let call = self.context(Operation::Get, id);
        call.finish(self.load(&call, id))
    }

    fn get_all(&self, criteria: &ListCriteria, filters: &Filters) -> RepoResult<Listing<R>> {
        let call = self.context(Operation::List, 0);
        call.finish(self.list(&call, criteria, filters))
    }

    fn insert(&self, record: &mut R) -> RepoResult<()> {
        let call = self.context(Operation::Insert, 0);
        call.finish(self.create(&call, record))
    }

    fn update(&self, record: &mut R) -> RepoResult<()> {
        let call = self.context(Operation::Update, record.id());
        call.finish(self.store(&call, record))
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let call = self.context(Operation::Delete, id);
        call.finish(self.remove(&call, id))
    }
}

impl<R> std::fmt::Debug for SqliteRecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore")
            .field("record", &std::any::type_name::<R>())
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}
