use crate::domain::model::Table;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Csv,
    Tsv,
}

impl Delimiter {
    pub fn byte(&self) -> u8 {
        match self {
            Delimiter::Csv => b',',
            Delimiter::Tsv => b'\t',
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Delimiter::Csv => "csv",
            Delimiter::Tsv => "tsv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub prefix: String,
    pub delimiter: Delimiter,
}

impl ExportOptions {
    pub fn new(prefix: impl Into<String>, delimiter: Delimiter) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter,
        }
    }

    /// `<prefix>_<index>.<ext>`, index zero-based.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}_{}.{}", self.prefix, index, self.delimiter.extension())
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Header row followed by one line per row. A table without columns
/// serializes to nothing.
pub fn to_delimited(table: &Table, delimiter: Delimiter) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .from_writer(Vec::new());

    if !table.columns().is_empty() {
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(table.columns().iter().map(|c| render_cell(row.get(c))))?;
        }
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

/// Writes each table to its own file and returns the written locations.
pub async fn write_tables<S: Storage>(
    storage: &S,
    tables: &[Table],
    options: &ExportOptions,
) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(tables.len());

    for (index, table) in tables.iter().enumerate() {
        let file_name = options.file_name(index);
        let data = to_delimited(table, options.delimiter)?;
        storage.write_file(&file_name, &data).await?;

        let location = storage.location(&file_name);
        tracing::info!("Written to {} ({} rows)", location, table.len());
        written.push(location);
    }

    Ok(written)
}
