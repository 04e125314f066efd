//! Parsers for the supported record layouts
//!
//! - JSON array of records: `[{"x": 1.5, "y": 4, "label": "A"}, ...]`
//! - NDJSON: one record object per line
//! - Column table: `{"x": [...], "y": [...], "labels": [...], "groups": [...]}`

use crate::error::AnalysisError;
use crate::types::{value_as_number, RawRecord};
use serde::Deserialize;

/// Reader for raw records in the supported text layouts
pub struct RecordReader;

impl RecordReader {
    /// Parse a JSON string containing an array of records
    pub fn parse_array(json: &str) -> Result<Vec<RawRecord>, AnalysisError> {
        let records: Vec<RawRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) records
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RawRecord>, AnalysisError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(AnalysisError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Parse a column table into records paired by position.
    ///
    /// `x` and `y` are required; `labels` and `groups` are optional. All
    /// present columns must have the same length.
    pub fn parse_columns(json: &str) -> Result<Vec<RawRecord>, AnalysisError> {
        let table: ColumnTable = serde_json::from_str(json)?;
        table.into_records()
    }
}

#[derive(Debug, Deserialize)]
struct ColumnTable {
    x: Option<Vec<serde_json::Value>>,
    y: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    labels: Option<Vec<Option<String>>>,
    #[serde(default)]
    groups: Option<Vec<Option<String>>>,
}

impl ColumnTable {
    fn into_records(self) -> Result<Vec<RawRecord>, AnalysisError> {
        let xs = self
            .x
            .ok_or_else(|| AnalysisError::MissingColumn("x".to_string()))?;
        let ys = self
            .y
            .ok_or_else(|| AnalysisError::MissingColumn("y".to_string()))?;

        let expected = xs.len();
        check_length("y", expected, ys.len())?;
        if let Some(labels) = &self.labels {
            check_length("labels", expected, labels.len())?;
        }
        if let Some(groups) = &self.groups {
            check_length("groups", expected, groups.len())?;
        }

        let mut labels = self.labels.map(|l| l.into_iter());
        let mut groups = self.groups.map(|g| g.into_iter());

        let records = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| RawRecord {
                x: value_as_number(x),
                y: value_as_number(y),
                label: labels.as_mut().and_then(|it| it.next()).flatten(),
                group: groups.as_mut().and_then(|it| it.next()).flatten(),
            })
            .collect();

        Ok(records)
    }
}

fn check_length(column: &str, expected: usize, actual: usize) -> Result<(), AnalysisError> {
    if expected != actual {
        return Err(AnalysisError::LengthMismatch {
            column: column.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
