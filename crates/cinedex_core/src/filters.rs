//! Listing filters and sort validation.
//!
//! # Responsibility
//! - Range-check page and page size without clamping.
//! - Decompose a sort request into a safelisted column and a direction.
//! - Derive `LIMIT`/`OFFSET` values for listing queries.
//!
//! # Invariants
//! - A [`SortKey`] column always points at a safelist entry, never at the
//!   caller's string. It is the only request-derived text that reaches SQL.
//! - Safelist entries must be plain SQL identifiers.

use crate::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Largest accepted page number.
pub const MAX_PAGE: i64 = 10_000_000;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Sort key used when the caller does not ask for one.
pub const DEFAULT_SORT: &str = "id";

static SQL_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Ordering direction of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Safelist-approved sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    column: &'static str,
    direction: SortDirection,
}

impl SortKey {
    /// Validates `sort` against `safelist`.
    ///
    /// A single leading `-` selects descending order and is stripped before
    /// the exact, case-sensitive safelist lookup.
    pub fn parse(sort: &str, safelist: &'static [&'static str]) -> Result<Self, ValidationError> {
        let (name, direction) = match sort.strip_prefix('-') {
            Some(stripped) => (stripped, SortDirection::Descending),
            None => (sort, SortDirection::Ascending),
        };

        safelist
            .iter()
            .copied()
            .find(|entry| *entry == name && SQL_IDENTIFIER_RE.is_match(entry))
            .map(|column| Self { column, direction })
            .ok_or_else(|| ValidationError::single("sort", "invalid sort value"))
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Per-request pagination and sort input for listing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    /// Sort key, optionally prefixed with `-` for descending order.
    pub sort: String,
    /// Sort keys this listing accepts.
    pub sort_safelist: &'static [&'static str],
}

impl Filters {
    pub fn new(
        page: i64,
        page_size: i64,
        sort: impl Into<String>,
        sort_safelist: &'static [&'static str],
    ) -> Self {
        Self {
            page,
            page_size,
            sort: sort.into(),
            sort_safelist,
        }
    }

    /// First page, default page size, ascending by id.
    pub fn first_page(sort_safelist: &'static [&'static str]) -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, DEFAULT_SORT, sort_safelist)
    }

    /// Checks every field and returns the approved sort key.
    ///
    /// All failing fields are reported together.
    pub fn validate(&self) -> Result<SortKey, ValidationError> {
        let mut errors = ValidationError::new();
        errors.check(self.page > 0, "page", "must be greater than zero");
        errors.check(
            self.page <= MAX_PAGE,
            "page",
            "must be a maximum of 10 million",
        );
        errors.check(self.page_size > 0, "page_size", "must be greater than zero");
        errors.check(
            self.page_size <= MAX_PAGE_SIZE,
            "page_size",
            format!("must be a maximum of {MAX_PAGE_SIZE}"),
        );

        match SortKey::parse(&self.sort, self.sort_safelist) {
            Ok(sort_key) => {
                errors.into_result()?;
                Ok(sort_key)
            }
            Err(sort_errors) => {
                errors.merge(sort_errors);
                Err(errors)
            }
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::{Filters, SortDirection, SortKey};

    const SAFELIST: &[&str] = &["id", "title", "year"];

    #[test]
    fn descending_prefix_is_stripped() {
        let key = SortKey::parse("-title", SAFELIST).unwrap();
        assert_eq!(key.column(), "title");
        assert_eq!(key.direction(), SortDirection::Descending);
        assert_eq!(key.direction().as_sql(), "DESC");
    }

    #[test]
    fn only_one_prefix_is_stripped() {
        assert!(SortKey::parse("--title", SAFELIST).is_err());
    }

    #[test]
    fn matching_is_exact() {
        for bad in ["Title", "titl", "title ", "id;DROP TABLE movies", ""] {
            let err = SortKey::parse(bad, SAFELIST).unwrap_err();
            assert_eq!(err.field("sort"), Some("invalid sort value"), "{bad}");
        }
    }

    #[test]
    fn non_identifier_safelist_entries_never_match() {
        const UNSAFE: &[&str] = &["title DESC; --"];
        assert!(SortKey::parse("title DESC; --", UNSAFE).is_err());
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let filters = Filters::new(0, 500, "rating", SAFELIST);
        let err = filters.validate().unwrap_err();
        assert_eq!(err.field("page"), Some("must be greater than zero"));
        assert_eq!(err.field("page_size"), Some("must be a maximum of 100"));
        assert_eq!(err.field("sort"), Some("invalid sort value"));
    }

    #[test]
    fn validate_rejects_page_past_limit() {
        let filters = Filters::new(10_000_001, 20, "id", SAFELIST);
        let err = filters.validate().unwrap_err();
        assert_eq!(err.field("page"), Some("must be a maximum of 10 million"));
    }

    #[test]
    fn first_page_defaults_are_valid() {
        let filters = Filters::first_page(SAFELIST);
        let key = filters.validate().unwrap();
        assert_eq!(key.column(), "id");
        assert_eq!(key.direction(), SortDirection::Ascending);
        assert_eq!(filters.limit(), 20);
        assert_eq!(filters.offset(), 0);
    }
}
