//! Movie record.

use super::check_text;
use crate::validation::{unique, ValidationError};
use serde::{Deserialize, Serialize};

/// Earliest accepted release year.
pub const MIN_RELEASE_YEAR: i32 = 1888;
/// Latest accepted release year.
pub const MAX_RELEASE_YEAR: i32 = 2100;
/// Most genres one movie may carry.
pub const MAX_GENRES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    /// Unix epoch milliseconds, assigned by the store on insert.
    #[serde(skip)]
    pub created_at: i64,
    pub title: String,
    pub year: i32,
    /// Running time in minutes.
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

impl Movie {
    /// Builds an unsaved movie. Store-generated fields stay zero.
    pub fn new(
        title: impl Into<String>,
        year: i32,
        runtime: i32,
        genres: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            year,
            runtime,
            genres: genres.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, "title", &self.title);

        errors.check(self.year != 0, "year", "must be provided");
        errors.check(
            self.year >= MIN_RELEASE_YEAR,
            "year",
            format!("must be greater than {}", MIN_RELEASE_YEAR - 1),
        );
        errors.check(
            self.year <= MAX_RELEASE_YEAR,
            "year",
            format!("must not be later than {MAX_RELEASE_YEAR}"),
        );

        errors.check(self.runtime != 0, "runtime", "must be provided");
        errors.check(self.runtime > 0, "runtime", "must be a positive integer");

        errors.check(
            !self.genres.is_empty(),
            "genres",
            "must contain at least 1 genre",
        );
        errors.check(
            self.genres.len() <= MAX_GENRES,
            "genres",
            format!("must not contain more than {MAX_GENRES} genres"),
        );
        errors.check(
            self.genres.iter().all(|genre| !genre.trim().is_empty()),
            "genres",
            "must not contain blank values",
        );
        errors.check(
            unique(&self.genres),
            "genres",
            "must not contain duplicate values",
        );

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::Movie;

    #[test]
    fn valid_movie_passes() {
        let movie = Movie::new("Casablanca", 1942, 102, ["drama", "romance"]);
        assert!(movie.validate().is_ok());
        assert_eq!(movie.id, 0);
        assert_eq!(movie.version, 0);
    }

    #[test]
    fn every_bad_field_is_reported() {
        let movie = Movie::new("", 1700, -5, ["drama", "drama"]);
        let err = movie.validate().unwrap_err();
        assert_eq!(err.field("title"), Some("must be provided"));
        assert_eq!(err.field("year"), Some("must be greater than 1887"));
        assert_eq!(err.field("runtime"), Some("must be a positive integer"));
        assert_eq!(err.field("genres"), Some("must not contain duplicate values"));
    }

    #[test]
    fn genres_are_bounded() {
        let none = Movie::new("Solaris", 1972, 167, Vec::<String>::new());
        assert_eq!(
            none.validate().unwrap_err().field("genres"),
            Some("must contain at least 1 genre")
        );

        let many = Movie::new("Solaris", 1972, 167, ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(
            many.validate().unwrap_err().field("genres"),
            Some("must not contain more than 5 genres")
        );
    }

    #[test]
    fn created_at_is_not_serialized() {
        let mut movie = Movie::new("Heat", 1995, 170, ["crime"]);
        movie.created_at = 1_700_000_000_000;
        let json = serde_json::to_value(&movie).unwrap();
        assert!(json.get("created_at").is_none());
        assert_eq!(json["genres"][0], "crime");
    }
}
