use crate::api::ApiResponse;
use crate::core::resolve::SegmentObservations;
use crate::domain::model::{Table, TransformResult};
use serde_json::{Map, Value};

pub const SEGMENT_CODE_COLUMN: &str = "segment_code";
pub const SEGMENT_DESCRIPTION_COLUMN: &str = "segment_description";

/// Builds a table from array elements. Non-object elements become a single
/// `value` column.
pub fn build_table(rows: &[Value]) -> Table {
    let mut table = Table::new();
    for row in rows {
        let record = match row {
            Value::Object(map) => map.clone(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other.clone());
                map
            }
        };
        table.push_record(record);
    }
    table
}

fn table_for(response: &ApiResponse, key: &str, label: &str) -> Option<Table> {
    match response {
        ApiResponse::Failure { status, reason } => {
            match status {
                Some(code) => tracing::warn!("No '{}' for {}: request failed with {} ({})", key, label, code, reason),
                None => tracing::warn!("No '{}' for {}: request failed ({})", key, label, reason),
            }
            None
        }
        ApiResponse::Success(payload) => match payload.get(key) {
            Some(Value::Array(rows)) => Some(build_table(rows)),
            Some(_) => {
                tracing::warn!("'{}' for {} is not an array, skipping", key, label);
                None
            }
            None => {
                tracing::warn!("No '{}' key found for {}", key, label);
                None
            }
        },
    }
}

/// One table per response holding an array under `key`; others are skipped.
pub fn flatten_responses<'a, I>(responses: I, key: &str) -> TransformResult
where
    I: IntoIterator<Item = (&'a str, &'a ApiResponse)>,
{
    let mut result = TransformResult::default();
    for (label, response) in responses {
        match table_for(response, key, label) {
            Some(table) => result.tables.push(table),
            None => result.skipped += 1,
        }
    }
    result
}

/// Observation tables, each stamped with the code and description of the
/// segment its response was fetched for.
pub fn flatten_observations(fetched: &[SegmentObservations]) -> TransformResult {
    let mut result = TransformResult::default();
    for item in fetched {
        let Some(mut table) = table_for(&item.response, "observations", &item.segment.code) else {
            result.skipped += 1;
            continue;
        };
        table.stamp_column(SEGMENT_CODE_COLUMN, Value::String(item.segment.code.clone()));
        table.stamp_column(
            SEGMENT_DESCRIPTION_COLUMN,
            Value::String(item.segment.description.clone()),
        );
        result.tables.push(table);
    }
    result
}
