//! Director record.

use super::check_text;
use crate::validation::{unique, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<String>,
    pub version: i32,
}

impl Director {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        awards: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            awards: awards.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_text(&mut errors, "name", &self.name);
        check_text(&mut errors, "surname", &self.surname);
        errors.check(
            self.awards.iter().all(|award| !award.trim().is_empty()),
            "awards",
            "must not contain blank values",
        );
        errors.check(
            unique(&self.awards),
            "awards",
            "must not contain duplicate values",
        );
        errors.into_result()
    }
}
