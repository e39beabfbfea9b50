//! Record stores and their persistence contract.
//!
//! # Responsibility
//! - Define the uniform get/list/insert/update/delete contract.
//! - Keep SQL text and SQLite error shapes out of callers.
//!
//! # Invariants
//! - Writes run record validation before persistence.
//! - Every store operation fails with a [`RepoError`] classified by
//!   [`ErrorKind`].

pub mod error;
pub mod models;
pub mod query;
pub mod record_store;
pub mod records;
pub mod schema;

pub use error::{ErrorKind, Operation, RepoError, RepoResult};
pub use models::Models;
pub use record_store::{RecordRepository, SqliteRecordStore};
pub use records::{ACTOR_SORT_SAFELIST, DIRECTOR_SORT_SAFELIST, MOVIE_SORT_SAFELIST};
pub use schema::{ListCriteria, Listing, Record, Schema};
