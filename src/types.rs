//! Core types for the Correlation Lens pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw records, validated samples, the filtered dataset, and the
//! correlation result handed to display collaborators.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A raw input record as supplied by a data source.
///
/// Either component may be absent or non-numeric; such records are kept here
/// and rejected later by the filter so that rejections can be reported by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// First variable (e.g. price, arena capacity)
    #[serde(default, deserialize_with = "lenient_number")]
    pub x: Option<f64>,
    /// Second variable (e.g. rating, championship wins)
    #[serde(default, deserialize_with = "lenient_number")]
    pub y: Option<f64>,
    /// Optional display label (brand, team name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional grouping key used for balance checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl RawRecord {
    pub fn new(x: Option<f64>, y: Option<f64>) -> Self {
        Self {
            x,
            y,
            label: None,
            group: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Accept numbers and numeric strings; map everything else to `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_as_number(&value))
}

pub(crate) fn value_as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A validated `(x, y)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            group: None,
        }
    }
}

/// Ordered sequence of validated samples.
///
/// Insertion order is preserved and duplicates are retained. Positions do not
/// line up with the raw input once records have been rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build a dataset from bare pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            samples: pairs.iter().map(|&(x, y)| Sample::new(x, y)).collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Same samples with the roles of x and y exchanged
    pub fn swapped(&self) -> Self {
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| Sample {
                    x: s.y,
                    y: s.x,
                    label: s.label.clone(),
                    group: s.group.clone(),
                })
                .collect(),
        }
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Qualitative strength/direction of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationBucket {
    StrongPositive,
    ModeratePositive,
    Weak,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationBucket::StrongPositive => "strong_positive",
            CorrelationBucket::ModeratePositive => "moderate_positive",
            CorrelationBucket::Weak => "weak",
            CorrelationBucket::ModerateNegative => "moderate_negative",
            CorrelationBucket::StrongNegative => "strong_negative",
        }
    }

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            CorrelationBucket::StrongPositive => "Strong positive correlation",
            CorrelationBucket::ModeratePositive => "Moderate positive correlation",
            CorrelationBucket::Weak => "Weak or no correlation",
            CorrelationBucket::ModerateNegative => "Moderate negative correlation",
            CorrelationBucket::StrongNegative => "Strong negative correlation",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            CorrelationBucket::StrongPositive | CorrelationBucket::ModeratePositive
        )
    }

    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            CorrelationBucket::StrongNegative | CorrelationBucket::ModerateNegative
        )
    }
}

impl fmt::Display for CorrelationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one correlation analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson coefficient in [-1, 1]; 0 for degenerate input
    pub coefficient: f64,
    pub bucket: CorrelationBucket,
    pub explanation: String,
    /// Number of samples the coefficient was computed over
    pub sample_count: usize,
}

/// Why a raw record was left out of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingX,
    MissingY,
    NonFiniteX,
    NonFiniteY,
    XOutOfRange,
    YOutOfRange,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::MissingX => "x is missing or not numeric",
            RejectReason::MissingY => "y is missing or not numeric",
            RejectReason::NonFiniteX => "x is not finite",
            RejectReason::NonFiniteY => "y is not finite",
            RejectReason::XOutOfRange => "x fails the inclusion rule",
            RejectReason::YOutOfRange => "y fails the inclusion rule",
        };
        f.write_str(text)
    }
}

/// A rejected raw record, identified by its position in the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub index: usize,
    pub reason: RejectReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_record_parsing() {
        let json = r#"[
            {"x": 3.5, "y": "4.25", "label": "Nissin"},
            {"x": null, "y": 2},
            {"y": 1},
            {"x": "n/a", "y": true}
        ]"#;
        let records: Vec<RawRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].x, Some(3.5));
        assert_eq!(records[0].y, Some(4.25));
        assert_eq!(records[0].label.as_deref(), Some("Nissin"));
        assert_eq!(records[1].x, None);
        assert_eq!(records[1].y, Some(2.0));
        assert_eq!(records[2].x, None);
        assert_eq!(records[3].x, None);
        assert_eq!(records[3].y, None);
    }

    #[test]
    fn test_bucket_serialization() {
        let json = serde_json::to_string(&CorrelationBucket::ModerateNegative).unwrap();
        assert_eq!(json, "\"moderate_negative\"");
        assert_eq!(CorrelationBucket::ModerateNegative.as_str(), "moderate_negative");
        assert_eq!(
            CorrelationBucket::StrongPositive.to_string(),
            "Strong positive correlation"
        );
    }

    #[test]
    fn test_dataset_swapped() {
        let dataset = Dataset::from_pairs(&[(1.0, 10.0), (2.0, 20.0)]);
        let swapped = dataset.swapped();
        assert_eq!(swapped.samples()[0].x, 10.0);
        assert_eq!(swapped.samples()[1].y, 2.0);
        assert_eq!(swapped.len(), 2);
    }
}
