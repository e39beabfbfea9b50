//! Storage mappings for movies, actors and directors.
//!
//! # Invariants
//! - Set fields are stored as JSON arrays of strings.
//! - Read paths reject undecodable persisted state instead of masking it.

use crate::model::actor::Actor;
use crate::model::director::Director;
use crate::model::movie::Movie;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::query::encode_set;
use crate::repo::schema::{Record, Schema};
use crate::validation::ValidationError;
use rusqlite::types::Value;
use rusqlite::Row;

pub const MOVIE_SORT_SAFELIST: &[&str] = &["id", "title", "year", "runtime"];
pub const ACTOR_SORT_SAFELIST: &[&str] = &["id", "name", "surname", "version"];
pub const DIRECTOR_SORT_SAFELIST: &[&str] = &["id", "name", "surname"];

const MOVIE_SCHEMA: Schema = Schema {
    resource: "movie",
    table: "movies",
    columns: &[
        "id",
        "created_at",
        "title",
        "year",
        "runtime",
        "genres",
        "version",
    ],
    write_columns: &["title", "year", "runtime", "genres"],
    generated_columns: &["id", "created_at", "version"],
    search_index: "movies_fts",
    set_column: Some("genres"),
    sort_safelist: MOVIE_SORT_SAFELIST,
};

const ACTOR_SCHEMA: Schema = Schema {
    resource: "actor",
    table: "actors",
    columns: &["id", "name", "surname", "version"],
    write_columns: &["name", "surname"],
    generated_columns: &["id", "version"],
    search_index: "actors_fts",
    set_column: None,
    sort_safelist: ACTOR_SORT_SAFELIST,
};

const DIRECTOR_SCHEMA: Schema = Schema {
    resource: "director",
    table: "directors",
    columns: &["id", "name", "surname", "awards", "version"],
    write_columns: &["name", "surname", "awards"],
    generated_columns: &["id", "version"],
    search_index: "directors_fts",
    set_column: Some("awards"),
    sort_safelist: DIRECTOR_SORT_SAFELIST,
};

impl Record for Movie {
    const SCHEMA: &'static Schema = &MOVIE_SCHEMA;

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Movie::validate(self)
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.title.clone()),
            Value::Integer(i64::from(self.year)),
            Value::Integer(i64::from(self.runtime)),
            Value::Text(encode_set(&self.genres)?),
        ])
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id").map_err(invalid_row)?,
            created_at: row.get("created_at").map_err(invalid_row)?,
            title: row.get("title").map_err(invalid_row)?,
            year: row.get("year").map_err(invalid_row)?,
            runtime: row.get("runtime").map_err(invalid_row)?,
            genres: decode_set(row, "movies", "genres")?,
            version: row.get("version").map_err(invalid_row)?,
        })
    }

    fn apply_generated(&mut self, row: &Row<'_>) -> rusqlite::Result<()> {
        self.id = row.get("id")?;
        self.created_at = row.get("created_at")?;
        self.version = row.get("version")?;
        Ok(())
    }
}

impl Record for Actor {
    const SCHEMA: &'static Schema = &ACTOR_SCHEMA;

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Actor::validate(self)
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.name.clone()),
            Value::Text(self.surname.clone()),
        ])
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id").map_err(invalid_row)?,
            name: row.get("name").map_err(invalid_row)?,
            surname: row.get("surname").map_err(invalid_row)?,
            version: row.get("version").map_err(invalid_row)?,
        })
    }

    fn apply_generated(&mut self, row: &Row<'_>) -> rusqlite::Result<()> {
        self.id = row.get("id")?;
        self.version = row.get("version")?;
        Ok(())
    }
}

impl Record for Director {
    const SCHEMA: &'static Schema = &DIRECTOR_SCHEMA;

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Director::validate(self)
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.name.clone()),
            Value::Text(self.surname.clone()),
            Value::Text(encode_set(&self.awards)?),
        ])
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id").map_err(invalid_row)?,
            name: row.get("name").map_err(invalid_row)?,
            surname: row.get("surname").map_err(invalid_row)?,
            awards: decode_set(row, "directors", "awards")?,
            version: row.get("version").map_err(invalid_row)?,
        })
    }

    fn apply_generated(&mut self, row: &Row<'_>) -> rusqlite::Result<()> {
        self.id = row.get("id")?;
        self.version = row.get("version")?;
        Ok(())
    }
}

fn invalid_row(err: rusqlite::Error) -> RepoError {
    RepoError::InvalidData(err.to_string())
}

fn decode_set(row: &Row<'_>, table: &str, column: &str) -> RepoResult<Vec<String>> {
    let raw: String = row.get(column).map_err(invalid_row)?;
    serde_json::from_str(&raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid set value `{raw}` in {table}.{column}"
        ))
    })
}
