//! Domain records served by the record stores.
//!
//! # Responsibility
//! - Define the owned record shapes handed to and returned by stores.
//! - Validate field values before any write reaches storage.
//!
//! # Invariants
//! - `id` is zero until the store assigns one and never changes afterwards.
//! - `version` starts at 1 on insert and grows by one per successful update.

pub mod actor;
pub mod director;
pub mod movie;

/// Upper bound for free-text fields, in bytes.
pub const MAX_TEXT_BYTES: usize = 500;

pub(crate) fn check_text(
    errors: &mut crate::validation::ValidationError,
    field: &'static str,
    value: &str,
) {
    errors.check(!value.trim().is_empty(), field, "must be provided");
    errors.check(
        value.len() <= MAX_TEXT_BYTES,
        field,
        format!("must not be more than {MAX_TEXT_BYTES} bytes long"),
    );
}
