//! Field-level validation errors.
//!
//! # Responsibility
//! - Collect every failing input field in one pass.
//! - Give callers a stable `field -> message` map to report back.
//!
//! # Invariants
//! - The first message recorded for a field wins.
//! - An empty error set is never returned as `Err`.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failed checks keyed by input field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an error carrying a single failed field.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records `message` for `field` unless the field already failed.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Records `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Folds another error set into this one.
    pub fn merge(&mut self, other: ValidationError) {
        for (field, message) in other.errors {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message recorded for `field`, if it failed.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All failures ordered by field name.
    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    /// Turns the collected checks into a result.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        let mut separator = ": ";
        for (field, message) in &self.errors {
            write!(f, "{separator}{field} {message}")?;
            separator = "; ";
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Returns whether all values are distinct.
pub fn unique<T: Ord>(values: &[T]) -> bool {
    let mut seen = std::collections::BTreeSet::new();
    values.iter().all(|value| seen.insert(value))
}

#[cfg(test)]
mod tests {
    use super::{unique, ValidationError};

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = ValidationError::new();
        errors.check(false, "page", "must be greater than zero");
        errors.check(false, "page", "must be a maximum of 10 million");
        errors.check(true, "sort", "invalid sort value");

        assert_eq!(errors.field("page"), Some("must be greater than zero"));
        assert_eq!(errors.field("sort"), None);
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn empty_set_converts_to_ok() {
        assert!(ValidationError::new().into_result().is_ok());
        assert!(ValidationError::single("title", "must be provided")
            .into_result()
            .is_err());
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut errors = ValidationError::single("year", "must be provided");
        errors.add("title", "must be provided");
        assert_eq!(
            errors.to_string(),
            "validation failed: title must be provided; year must be provided"
        );
    }

    #[test]
    fn unique_detects_duplicates() {
        assert!(unique(&["drama", "comedy"]));
        assert!(!unique(&["drama", "drama"]));
        assert!(unique::<String>(&[]));
    }
}
