//! Data sources
//!
//! A data source supplies the raw paired records for one analysis. Failing to
//! obtain input (missing column, malformed text) is an error; a well-formed
//! but empty input is an empty record list.

mod reader;

pub use reader::RecordReader;

use crate::error::AnalysisError;
use crate::types::RawRecord;
use serde::{Deserialize, Serialize};

/// Supplier of raw records
pub trait DataSource {
    fn load(&self) -> Result<Vec<RawRecord>, AnalysisError>;
}

/// Text layouts understood by [`RecordReader`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// JSON array of record objects
    #[default]
    Json,
    /// One record object per line
    Ndjson,
    /// Object of parallel columns
    Columns,
}

impl InputFormat {
    pub fn parse(&self, text: &str) -> Result<Vec<RawRecord>, AnalysisError> {
        match self {
            InputFormat::Json => RecordReader::parse_array(text),
            InputFormat::Ndjson => RecordReader::parse_ndjson(text),
            InputFormat::Columns => RecordReader::parse_columns(text),
        }
    }
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource(pub Vec<RawRecord>);

impl MemorySource {
    /// Pair two equal-length columns; absent entries become missing values
    pub fn from_columns(xs: &[Option<f64>], ys: &[Option<f64>]) -> Result<Self, AnalysisError> {
        if xs.len() != ys.len() {
            return Err(AnalysisError::LengthMismatch {
                column: "y".to_string(),
                expected: xs.len(),
                actual: ys.len(),
            });
        }
        Ok(Self(
            xs.iter()
                .zip(ys.iter())
                .map(|(&x, &y)| RawRecord::new(x, y))
                .collect(),
        ))
    }
}

impl DataSource for MemorySource {
    fn load(&self) -> Result<Vec<RawRecord>, AnalysisError> {
        Ok(self.0.clone())
    }
}

/// Records encoded as text in one of the [`InputFormat`] layouts
#[derive(Debug, Clone)]
pub struct TextSource {
    pub text: String,
    pub format: InputFormat,
}

impl TextSource {
    pub fn new(text: impl Into<String>, format: InputFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

impl DataSource for TextSource {
    fn load(&self) -> Result<Vec<RawRecord>, AnalysisError> {
        self.format.parse(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_from_columns() {
        let source =
            MemorySource::from_columns(&[Some(1.0), None, Some(3.0)], &[Some(2.0), Some(4.0), None])
                .unwrap();
        let records = source.load().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].x, None);
        assert_eq!(records[2].y, None);

        assert!(MemorySource::from_columns(&[Some(1.0)], &[]).is_err());
    }

    #[test]
    fn test_text_source_formats() {
        let json = TextSource::new(r#"[{"x": 1, "y": 2}]"#, InputFormat::Json);
        assert_eq!(json.load().unwrap().len(), 1);

        let ndjson = TextSource::new("{\"x\": 1, \"y\": 2}\n{\"x\": 2, \"y\": 3}", InputFormat::Ndjson);
        assert_eq!(ndjson.load().unwrap().len(), 2);

        let columns = TextSource::new(r#"{"x": [1, 2, 3], "y": [3, 2, 1]}"#, InputFormat::Columns);
        assert_eq!(columns.load().unwrap().len(), 3);
    }

    #[test]
    fn test_input_format_names() {
        let format: InputFormat = serde_json::from_str("\"columns\"").unwrap();
        assert_eq!(format, InputFormat::Columns);
    }
}
