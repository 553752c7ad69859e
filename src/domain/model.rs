use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category id reported for a series whose lookup yielded no category.
pub const NOT_FOUND: &str = "Not Found";

/// A series code paired with a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub code: String,
    pub description: String,
}

impl SeriesEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Rectangular view over a list of JSON objects.
///
/// Columns are the union of keys in first-seen order. A row that lacks a
/// column yields no value for it, rendered as an empty cell on export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(&mut self, record: Map<String, Value>) {
        for key in record.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(record);
    }

    /// Sets `name` to `value` on every row, appending the column if new.
    pub fn stamp_column(&mut self, name: &str, value: Value) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
        for row in &mut self.rows {
            row.insert(name.to_string(), value.clone());
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub tables: Vec<Table>,
    /// Responses that produced no table.
    pub skipped: usize,
}
