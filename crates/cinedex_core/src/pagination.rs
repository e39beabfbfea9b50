//! Pagination metadata for listing results.
//!
//! # Responsibility
//! - Turn a total match count into page navigation metadata.
//!
//! # Invariants
//! - A zero total yields all-zero metadata.
//! - `last_page` is the ceiling of total / page size.

use serde::{Deserialize, Serialize};

/// Position of one result page within the full matching set.
///
/// All fields are zero when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

/// Computes navigation metadata from a total match count.
pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records == 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate_metadata, Metadata};

    #[test]
    fn zero_total_is_all_zero() {
        let metadata = calculate_metadata(0, 3, 20);
        assert_eq!(metadata, Metadata::default());
        assert!(metadata.is_empty());
    }

    #[test]
    fn last_page_rounds_up() {
        let metadata = calculate_metadata(41, 2, 20);
        assert_eq!(metadata.first_page, 1);
        assert_eq!(metadata.last_page, 3);
        assert_eq!(metadata.current_page, 2);
        assert_eq!(metadata.page_size, 20);
        assert_eq!(metadata.total_records, 41);
    }

    #[test]
    fn exact_multiple_does_not_add_page() {
        assert_eq!(calculate_metadata(40, 1, 20).last_page, 2);
        assert_eq!(calculate_metadata(1, 1, 100).last_page, 1);
    }
}
