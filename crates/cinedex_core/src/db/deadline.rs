//! Per-statement execution deadlines.
//!
//! SQLite has no statement timeout, so the deadline rides on the progress
//! handler: once it fires, the running statement fails with
//! `SQLITE_INTERRUPT` and the connection stays usable.
//!
//! # Invariants
//! - A guard disarms its handler on drop, before the connection goes back
//!   to the pool.

use rusqlite::{Connection, ErrorCode};
use std::os::raw::c_int;
use std::time::{Duration, Instant};

/// Number of VM instructions between deadline checks.
const PROGRESS_CHECK_OPS: c_int = 1_000;

/// Arms a deadline on a connection for the lifetime of the guard.
pub struct DeadlineGuard<'conn> {
    conn: &'conn Connection,
}

impl<'conn> DeadlineGuard<'conn> {
    /// Interrupts any statement on `conn` still running after `budget`.
    pub fn arm(conn: &'conn Connection, budget: Duration) -> Self {
        match Instant::now().checked_add(budget) {
            Some(expires_at) => conn.progress_handler(
                PROGRESS_CHECK_OPS,
                Some(move || Instant::now() >= expires_at),
            ),
            None => conn.progress_handler(0, None::<fn() -> bool>),
        }
        Self { conn }
    }
}

impl Drop for DeadlineGuard<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }
}

/// Returns whether `err` means the statement ran out of time.
///
/// Covers both an interrupt raised by [`DeadlineGuard`] and a lock wait that
/// outlived the connection busy timeout.
pub fn is_deadline_exceeded(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::OperationInterrupted)
            | Some(ErrorCode::DatabaseBusy)
            | Some(ErrorCode::DatabaseLocked)
    )
}
