//! Key-indexed dataset model and the diff primitives shared by the
//! breakdown and summary stages

use crate::error::{DriftScanError, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    /// Textual representation used for every drift comparison.
    ///
    /// Coercing both sides to text before comparing is deliberate: it makes
    /// the engine's output reproducible regardless of how a cell was typed at
    /// load time, and it is the only equality the engine defines.
    pub fn coerce(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Number(n) => n.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// A single row: column name → value, in column order
pub type Row = IndexMap<String, Value>;

/// An ordered collection of rows indexed by the coerced value of a
/// designated key field.
///
/// The key field is held out of the data columns, mirroring an index: row
/// identity across dataset versions is the coerced key text. Key values must
/// be unique within one snapshot; a duplicate key is caller error and the
/// later row silently replaces the earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    key_field: String,
    columns: Vec<String>,
    rows: IndexMap<String, Row>,
}

impl Dataset {
    /// Create an empty dataset with the given key field and data columns
    pub fn new(key_field: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            key_field: key_field.into(),
            columns,
            rows: IndexMap::new(),
        }
    }

    /// Build a dataset from raw rows that still carry the key field as a
    /// column. The key cell is extracted into the index; the remaining
    /// columns become the data columns, in first-row order.
    ///
    /// Fails with a schema error if the key field is absent from a row.
    pub fn from_rows(key_field: impl Into<String>, raw_rows: Vec<Row>) -> Result<Self> {
        let key_field = key_field.into();

        let columns: Vec<String> = raw_rows
            .first()
            .map(|row| {
                row.keys()
                    .filter(|c| **c != key_field)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let mut rows = IndexMap::with_capacity(raw_rows.len());
        for mut raw in raw_rows {
            let key = raw.shift_remove(&key_field).ok_or_else(|| {
                DriftScanError::schema(format!("key field '{key_field}' not found in dataset row"))
            })?;
            // Normalize the row to the column list; absent cells read as null
            let row: Row = columns
                .iter()
                .map(|c| (c.clone(), raw.get(c).cloned().unwrap_or(Value::Null)))
                .collect();
            rows.insert(key.coerce(), row);
        }

        Ok(Self {
            key_field,
            columns,
            rows,
        })
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.rows.get(key)
    }

    /// Iterate rows in dataset order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.rows.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Coerced text of one cell; absent cells read as null
    pub fn cell_text(&self, key: &str, column: &str) -> String {
        self.rows
            .get(key)
            .and_then(|row| row.get(column))
            .map(Value::coerce)
            .unwrap_or_else(|| Value::Null.coerce())
    }

    /// Distinct coerced values of one column
    pub fn column_values(&self, column: &str) -> HashSet<String> {
        self.rows
            .values()
            .map(|row| {
                row.get(column)
                    .map(Value::coerce)
                    .unwrap_or_else(|| Value::Null.coerce())
            })
            .collect()
    }

    /// New dataset with the given columns removed
    pub fn drop_columns(&self, dropped: &[String]) -> Dataset {
        let kept: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !dropped.contains(c))
            .cloned()
            .collect();
        self.select_columns(&kept)
    }

    /// New dataset restricted to the given columns, in the given order
    pub fn select_columns(&self, columns: &[String]) -> Dataset {
        let rows = self
            .rows
            .iter()
            .map(|(key, row)| {
                let projected: Row = columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                    .collect();
                (key.clone(), projected)
            })
            .collect();
        Dataset {
            key_field: self.key_field.clone(),
            columns: columns.to_vec(),
            rows,
        }
    }

    /// New dataset restricted and reordered to exactly the given keys.
    /// Keys not present in this dataset are skipped.
    pub fn reindex<'a, I>(&self, keys: I) -> Dataset
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows = keys
            .into_iter()
            .filter_map(|key| self.rows.get(key).map(|row| (key.to_string(), row.clone())))
            .collect();
        Dataset {
            key_field: self.key_field.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    /// New dataset with `other`'s rows appended after this dataset's rows,
    /// restricted to this dataset's columns. A shared key is overwritten by
    /// the appended row.
    pub fn concat(&self, other: &Dataset) -> Dataset {
        let mut result = self.clone();
        for (key, row) in other.rows() {
            let projected: Row = result
                .columns
                .iter()
                .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                .collect();
            result.rows.insert(key.to_string(), projected);
        }
        result
    }

    /// New dataset with every cell coerced to its textual form
    pub fn coerced(&self) -> Dataset {
        let rows = self
            .rows
            .iter()
            .map(|(key, row)| {
                let coerced: Row = row
                    .iter()
                    .map(|(c, v)| (c.clone(), Value::Text(v.coerce())))
                    .collect();
                (key.clone(), coerced)
            })
            .collect();
        Dataset {
            key_field: self.key_field.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Structural equality: same column set, same key set, same coerced cell
    /// values. Row order and column order are irrelevant.
    pub fn content_eq(&self, other: &Dataset) -> bool {
        if self.rows.len() != other.rows.len() {
            return false;
        }
        let own_columns: HashSet<&String> = self.columns.iter().collect();
        let other_columns: HashSet<&String> = other.columns.iter().collect();
        if own_columns != other_columns {
            return false;
        }
        for (key, row) in &self.rows {
            let Some(other_row) = other.rows.get(key) else {
                return false;
            };
            for column in &self.columns {
                let own = row.get(column).map(Value::coerce);
                let theirs = other_row.get(column).map(Value::coerce);
                if own.unwrap_or_else(|| Value::Null.coerce())
                    != theirs.unwrap_or_else(|| Value::Null.coerce())
                {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), v.clone()))
            .collect()
    }

    fn sample() -> Dataset {
        Dataset::from_rows(
            "unique_key",
            vec![
                row(&[
                    ("unique_key", "k1".into()),
                    ("status", "open".into()),
                    ("count", Value::Number(3.0)),
                ]),
                row(&[
                    ("unique_key", "k2".into()),
                    ("status", "closed".into()),
                    ("count", Value::Null),
                ]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_extracts_key() {
        let ds = sample();
        assert_eq!(ds.key_field(), "unique_key");
        assert_eq!(ds.columns(), &["status".to_string(), "count".to_string()]);
        assert_eq!(ds.keys().collect::<Vec<_>>(), vec!["k1", "k2"]);
    }

    #[test]
    fn test_from_rows_missing_key_is_schema_error() {
        let result = Dataset::from_rows("unique_key", vec![row(&[("status", "open".into())])]);
        assert!(matches!(result, Err(DriftScanError::Schema(_))));
    }

    #[test]
    fn test_coercion() {
        assert_eq!(Value::Null.coerce(), "null");
        assert_eq!(Value::Number(3.0).coerce(), "3");
        assert_eq!(Value::Number(3.5).coerce(), "3.5");
        assert_eq!(Value::Text("x".to_string()).coerce(), "x");
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Value::Date(date).coerce(), "2024-01-31");
    }

    #[test]
    fn test_drop_and_select_columns() {
        let ds = sample();
        let dropped = ds.drop_columns(&["count".to_string()]);
        assert_eq!(dropped.columns(), &["status".to_string()]);
        assert!(dropped.get("k1").unwrap().get("count").is_none());

        let selected = ds.select_columns(&["count".to_string()]);
        assert_eq!(selected.columns(), &["count".to_string()]);
    }

    #[test]
    fn test_reindex_restricts_and_reorders() {
        let ds = sample();
        let reindexed = ds.reindex(["k2", "k1", "missing"]);
        assert_eq!(reindexed.keys().collect::<Vec<_>>(), vec!["k2", "k1"]);
    }

    #[test]
    fn test_content_eq_ignores_order() {
        let ds = sample();
        let reordered = ds.reindex(["k2", "k1"]);
        assert!(ds.content_eq(&reordered));

        let fewer = ds.reindex(["k1"]);
        assert!(!ds.content_eq(&fewer));

        let narrower = ds.drop_columns(&["count".to_string()]);
        assert!(!ds.content_eq(&narrower));
    }

    #[test]
    fn test_content_eq_uses_coerced_values() {
        let typed = Dataset::from_rows(
            "unique_key",
            vec![row(&[("unique_key", "k1".into()), ("count", Value::Number(3.0))])],
        )
        .unwrap();
        let textual = Dataset::from_rows(
            "unique_key",
            vec![row(&[("unique_key", "k1".into()), ("count", "3".into())])],
        )
        .unwrap();
        assert!(typed.content_eq(&textual));
    }

    #[test]
    fn test_concat_projects_to_own_columns() {
        let ds = sample().drop_columns(&["count".to_string()]);
        let extra = Dataset::from_rows(
            "unique_key",
            vec![row(&[
                ("unique_key", "k3".into()),
                ("status", "open".into()),
                ("count", Value::Number(9.0)),
            ])],
        )
        .unwrap();
        let combined = ds.concat(&extra);
        assert_eq!(combined.keys().collect::<Vec<_>>(), vec!["k1", "k2", "k3"]);
        assert_eq!(combined.columns(), &["status".to_string()]);
        assert!(combined.get("k3").unwrap().get("count").is_none());
    }
}
