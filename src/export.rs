//! Flat CSV serialisation of traversed item records.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Column order of the exported file. Rows are built by explicit lookup so
/// upstream JSON key order can never reorder cells.
pub const ITEM_COLUMNS: [&str; 11] = [
    "taskId",
    "presentationId",
    "summary",
    "description",
    "unitOfMeasure",
    "plannedQuantity",
    "measuredQuantity",
    "unitPrice",
    "cumulativeMeasuredQuantity",
    "cumulativePercentage",
    "measureBalance",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes the header plus one row per record and returns the data row count.
/// The destination is created with truncation and flushed before returning.
pub fn export_csv(records: &[Value], path: &Path) -> Result<u64, ExportError> {
    let io = |source: csv::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(io)?;
    writer.write_record(ITEM_COLUMNS).map_err(io)?;

    let mut rows = 0u64;
    for record in records {
        writer.write_record(record_row(record)).map_err(io)?;
        rows += 1;
    }
    writer.flush().map_err(|e| io(csv::Error::from(e)))?;

    info!(path = %path.display(), rows, "Wrote CSV export");
    Ok(rows)
}

/// Explicit column-by-column projection of one decoded record. Missing or
/// null fields become empty cells; fields outside the schema are ignored.
fn record_row(record: &Value) -> Vec<String> {
    ITEM_COLUMNS
        .iter()
        .map(|column| cell(record.get(*column)))
        .collect()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_follows_schema_order_not_json_key_order() {
        let record = json!({
            "measureBalance": 5,
            "summary": "Foundation",
            "taskId": "T1",
            "plannedQuantity": 10.5,
        });
        let row = record_row(&record);
        assert_eq!(row.len(), ITEM_COLUMNS.len());
        assert_eq!(row[0], "T1");
        assert_eq!(row[2], "Foundation");
        assert_eq!(row[5], "10.5");
        assert_eq!(row[10], "5");
    }

    #[test]
    fn missing_and_null_fields_become_empty_cells() {
        let record = json!({"taskId": "T1", "description": null});
        let row = record_row(&record);
        assert_eq!(row[0], "T1");
        assert_eq!(row[3], "");
        assert_eq!(row[4], "");
    }

    #[test]
    fn numbers_and_bools_use_their_json_rendering() {
        assert_eq!(cell(Some(&json!(2.75))), "2.75");
        assert_eq!(cell(Some(&json!(100))), "100");
        assert_eq!(cell(Some(&json!(true))), "true");
    }
}
