//! Record store error taxonomy and store-failure normalization.
//!
//! # Responsibility
//! - Define the closed set of outcomes a store operation can fail with.
//! - Map raw SQLite failures to those outcomes in one place.
//! - Emit one metadata-only log event per store operation.
//!
//! # Invariants
//! - Callers never need to inspect `rusqlite` error shapes.
//! - Raw SQLite errors only enter [`RepoError`] through [`OperationContext::normalize`].
//! - A pool checkout that outlives the connection timeout is a `Timeout`,
//!   not a pool error.

use crate::db::deadline::is_deadline_exceeded;
use crate::db::DbError;
use crate::validation::ValidationError;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store operation that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    List,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::List => "list",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before the store was touched.
    Validation,
    /// No record at the requested identity.
    NotFound,
    /// The record changed since the caller read it.
    EditConflict,
    /// Statement deadline, lock wait, pool checkout wait or any other
    /// lower-level failure.
    Transient,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::EditConflict => "edit_conflict",
            Self::Transient => "transient",
        }
    }
}

/// Error returned by every record store operation.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound {
        resource: &'static str,
        id: i64,
    },
    EditConflict {
        resource: &'static str,
        id: i64,
    },
    Timeout {
        resource: &'static str,
        operation: Operation,
        deadline: Duration,
    },
    Db(DbError),
    InvalidData(String),
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::EditConflict { .. } => ErrorKind::EditConflict,
            Self::Timeout { .. } | Self::Db(_) | Self::InvalidData(_) => ErrorKind::Transient,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_edit_conflict(&self) -> bool {
        self.kind() == ErrorKind::EditConflict
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::EditConflict { resource, id } => write!(
                f,
                "edit conflict: {resource} {id} was modified since it was read"
            ),
            Self::Timeout {
                resource,
                operation,
                deadline,
            } => write!(
                f,
                "{resource} {} exceeded its {}ms deadline",
                operation.as_str(),
                deadline.as_millis()
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::EditConflict { .. }
            | Self::Timeout { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Identity of one in-flight store call.
pub(crate) struct OperationContext {
    resource: &'static str,
    operation: Operation,
    id: i64,
    deadline: Duration,
    started_at: Instant,
}

impl OperationContext {
    pub(crate) fn new(
        resource: &'static str,
        operation: Operation,
        id: i64,
        deadline: Duration,
    ) -> Self {
        Self {
            resource,
            operation,
            id,
            deadline,
            started_at: Instant::now(),
        }
    }

    pub(crate) fn not_found(&self) -> RepoError {
        RepoError::NotFound {
            resource: self.resource,
            id: self.id,
        }
    }

    /// Outcome of a pool checkout that gave up after `waited`.
    pub(crate) fn checkout_timed_out(&self, waited: Duration) -> RepoError {
        RepoError::Timeout {
            resource: self.resource,
            operation: self.operation,
            deadline: waited,
        }
    }

    /// Maps a raw SQLite failure to the store taxonomy.
    ///
    /// | store outcome            | result          |
    /// |--------------------------|-----------------|
    /// | no row on `get`          | `NotFound`      |
    /// | no row on `update`       | `EditConflict`  |
    /// | interrupted / busy       | `Timeout`       |
    /// | anything else            | `Db` (as is)    |
    pub(crate) fn normalize(&self, err: rusqlite::Error) -> RepoError {
        match (&err, self.operation) {
            (rusqlite::Error::QueryReturnedNoRows, Operation::Get) => self.not_found(),
            (rusqlite::Error::QueryReturnedNoRows, Operation::Update) => RepoError::EditConflict {
                resource: self.resource,
                id: self.id,
            },
            _ if is_deadline_exceeded(&err) => RepoError::Timeout {
                resource: self.resource,
                operation: self.operation,
                deadline: self.deadline,
            },
            _ => RepoError::Db(DbError::Sqlite(err)),
        }
    }

    /// Logs the outcome and hands it back unchanged.
    pub(crate) fn finish<T>(&self, result: RepoResult<T>) -> RepoResult<T> {
        let duration_ms = self.started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!(
                "event=record_{} module=repo status=ok resource={} id={} duration_ms={}",
                self.operation.as_str(),
                self.resource,
                self.id,
                duration_ms
            ),
            Err(err) if err.kind() == ErrorKind::Transient => warn!(
                "event=record_{} module=repo status=error resource={} id={} duration_ms={} error_kind={} error={}",
                self.operation.as_str(),
                self.resource,
                self.id,
                duration_ms,
                err.kind().as_str(),
                err
            ),
            Err(err) => debug!(
                "event=record_{} module=repo status=rejected resource={} id={} duration_ms={} error_kind={}",
                self.operation.as_str(),
                self.resource,
                self.id,
                duration_ms,
                err.kind().as_str()
            ),
        }
        result
    }
}
