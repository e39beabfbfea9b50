//! Parameterized SQL assembly for record stores.
//!
//! # Responsibility
//! - Build point, listing, insert, update and delete statements from a
//!   [`Schema`].
//! - Turn listing criteria into bound values, never into query text.
//!
//! # Invariants
//! - Interpolated fragments come only from `Schema` constants and from a
//!   [`SortKey`], whose column is an entry of the schema's own safelist.
//! - Listings count matches with a window aggregate in the same statement
//!   as the page, so both reflect one snapshot.
//! - Ordering always ends with `id ASC` so equal sort keys page stably.

use crate::filters::{Filters, SortKey};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ListCriteria, Schema};
use crate::validation::ValidationError;
use rusqlite::types::Value;
use rusqlite::ToSql;

/// Listing statement with its named parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub sql: String,
    params: Vec<(&'static str, Value)>,
}

impl ListQuery {
    /// Parameters in the form `Statement::query` accepts.
    pub fn params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect()
    }

    /// Bound value for a named parameter.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value)
    }
}

/// How the free-text part of a listing filters rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFilter {
    /// Blank input; every row matches.
    Any,
    /// FTS5 expression requiring every term.
    Match(String),
    /// Input with no searchable token; no row can match.
    Nothing,
}

impl TextFilter {
    /// Tokenizes free text into an all-terms FTS5 expression.
    ///
    /// Terms are quoted, so FTS5 operators in the input stay literal.
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return Self::Any;
        }

        let terms = text
            .split_whitespace()
            .filter(|term| term.chars().any(char::is_alphanumeric))
            .map(quote_fts_term)
            .collect::<Vec<_>>();

        if terms.is_empty() {
            Self::Nothing
        } else {
            Self::Match(terms.join(" AND "))
        }
    }
}

fn quote_fts_term(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

fn select_list(schema: &Schema) -> String {
    schema
        .columns
        .iter()
        .map(|column| format!("{table}.{column} AS {column}", table = schema.table))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Point lookup bound on `:id`.
pub fn select_by_id_sql(schema: &Schema) -> String {
    format!(
        "SELECT {columns} FROM {table} WHERE {table}.id = :id",
        columns = select_list(schema),
        table = schema.table,
    )
}

/// Builds the listing statement, or `None` when no row can match.
///
/// Fails with a validation error when `sort` is not in the schema's own
/// safelist, or when `contains` is set for a kind that has no set column.
pub fn build_list_query(
    schema: &Schema,
    criteria: &ListCriteria,
    filters: &Filters,
    sort: SortKey,
) -> RepoResult<Option<ListQuery>> {
    if !schema.sort_safelist.contains(&sort.column()) {
        return Err(RepoError::Validation(ValidationError::single(
            "sort",
            "invalid sort value",
        )));
    }

    let search = match TextFilter::parse(&criteria.search) {
        TextFilter::Any => String::new(),
        TextFilter::Match(expression) => expression,
        TextFilter::Nothing => return Ok(None),
    };

    let table = schema.table;
    let mut sql = format!(
        "SELECT count(*) OVER() AS total_records, {columns}
         FROM {table}
         WHERE (:search = '' OR {table}.id IN (
             SELECT rowid FROM {index} WHERE {index} MATCH :search
         ))",
        columns = select_list(schema),
        index = schema.search_index,
    );
    let mut params = vec![(":search", Value::Text(search))];

    match schema.set_column {
        Some(column) => {
            sql.push_str(&format!(
                "
           AND (:contains = '[]' OR NOT EXISTS (
             SELECT 1 FROM json_each(:contains) AS wanted
             WHERE wanted.value NOT IN (
                 SELECT held.value FROM json_each({table}.{column}) AS held
             )
         ))"
            ));
            params.push((":contains", Value::Text(encode_set(&criteria.contains)?)));
        }
        None if !criteria.contains.is_empty() => {
            return Err(RepoError::Validation(ValidationError::single(
                "contains",
                format!("is not supported for {}", schema.resource),
            )));
        }
        None => {}
    }

    sql.push_str(&format!(
        "
         ORDER BY {table}.{column} {direction}, {table}.id ASC
         LIMIT :limit OFFSET :offset",
        column = sort.column(),
        direction = sort.direction().as_sql(),
    ));
    params.push((":limit", Value::Integer(filters.limit())));
    params.push((":offset", Value::Integer(filters.offset())));

    Ok(Some(ListQuery { sql, params }))
}

/// Insert bound positionally on `write_columns`, returning generated values.
pub fn insert_sql(schema: &Schema) -> String {
    let placeholders = (1..=schema.write_columns.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({columns}) VALUES ({placeholders}) RETURNING {generated}",
        table = schema.table,
        columns = schema.write_columns.join(", "),
        generated = schema.generated_columns.join(", "),
    )
}

/// Version-conditioned update.
///
/// Binds `write_columns` positionally, then `id`, then the version the
/// caller read. Returns the incremented version.
pub fn update_sql(schema: &Schema) -> String {
    let width = schema.write_columns.len();
    let assignments = schema
        .write_columns
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {table} SET {assignments}, version = version + 1 \
         WHERE id = ?{id_slot} AND version = ?{version_slot} RETURNING version",
        table = schema.table,
        id_slot = width + 1,
        version_slot = width + 2,
    )
}

/// Delete bound on `:id`.
pub fn delete_sql(schema: &Schema) -> String {
    format!("DELETE FROM {table} WHERE id = :id", table = schema.table)
}

/// Encodes a string set as the JSON array stored in set columns.
pub fn encode_set(values: &[String]) -> RepoResult<String> {
    serde_json::to_string(values)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode set value: {err}")))
}
