//! Storage mapping contract shared by every record kind.
//!
//! # Responsibility
//! - Describe a record kind's table, columns, search index and safelist.
//! - Convert records to bound values and rows back to records.
//!
//! # Invariants
//! - Every identifier in a [`Schema`] is a compile-time constant; these are
//!   the only strings besides a validated sort key that reach query text.
//! - `sort_safelist` entries are a subset of `columns`.

use crate::pagination::Metadata;
use crate::repo::error::RepoResult;
use crate::validation::ValidationError;
use rusqlite::types::Value;
use rusqlite::Row;

/// Static storage layout of one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Singular name used in errors and logs.
    pub resource: &'static str,
    pub table: &'static str,
    /// Every stored column, `id` first.
    pub columns: &'static [&'static str],
    /// Caller-owned columns written by insert and update, in bind order.
    pub write_columns: &'static [&'static str],
    /// Store-assigned columns returned by insert.
    pub generated_columns: &'static [&'static str],
    /// FTS5 table indexing the searchable text column.
    pub search_index: &'static str,
    /// JSON-array column matched by containment filters, if any.
    pub set_column: Option<&'static str>,
    /// Sort keys accepted by listings.
    pub sort_safelist: &'static [&'static str],
}

/// A record kind the generic store can persist.
pub trait Record: Sized {
    const SCHEMA: &'static Schema;

    fn id(&self) -> i64;
    fn version(&self) -> i32;
    fn set_version(&mut self, version: i32);

    /// Field checks run before every write.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Values for [`Schema::write_columns`], in the same order.
    fn write_values(&self) -> RepoResult<Vec<Value>>;

    /// Decodes one row selected with [`Schema::columns`].
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;

    /// Copies [`Schema::generated_columns`] from an insert's returned row.
    fn apply_generated(&mut self, row: &Row<'_>) -> rusqlite::Result<()>;
}

/// Predicate values for a listing.
///
/// An empty `search` and an empty `contains` both match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCriteria {
    /// Free text matched token by token against the search index.
    pub search: String,
    /// Values the record's set column must all contain.
    pub contains: Vec<String>,
}

impl ListCriteria {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_contains(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.contains = values.into_iter().map(Into::into).collect();
        self
    }
}

/// One page of records plus its position in the full match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<R> {
    pub records: Vec<R>,
    pub metadata: Metadata,
}

impl<R> Listing<R> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            metadata: Metadata::default(),
        }
    }
}
