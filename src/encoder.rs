//! Report encoding
//!
//! This module encodes a finished analysis into a versioned JSON report with
//! producer metadata and provenance timestamps.

use crate::bias::BiasReport;
use crate::classify::ThresholdTable;
use crate::error::AnalysisError;
use crate::pipeline::Analysis;
use crate::summary::DatasetSummary;
use crate::types::{CorrelationResult, Rejection};
use crate::{LENS_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Who produced a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: Uuid,
}

/// Record counts before and after filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    pub total: usize,
    pub retained: usize,
    pub dropped: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<Rejection>,
}

/// Complete analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: DateTime<Utc>,
    pub input: ReportInput,
    pub thresholds: ThresholdTable,
    pub correlation: CorrelationResult,
    pub summary: DatasetSummary,
    pub bias: BiasReport,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: Uuid,
    include_rejections: bool,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            include_rejections: false,
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: Uuid) -> Self {
        Self {
            instance_id,
            include_rejections: false,
        }
    }

    /// List every rejected record in the report's input section
    pub fn include_rejections(mut self, include: bool) -> Self {
        self.include_rejections = include;
        self
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn encode(&self, analysis: &Analysis) -> AnalysisReport {
        let outcome = &analysis.outcome;

        AnalysisReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: LENS_VERSION.to_string(),
                instance_id: self.instance_id,
            },
            computed_at_utc: Utc::now(),
            input: ReportInput {
                total: outcome.total(),
                retained: outcome.retained(),
                dropped: outcome.dropped(),
                rejections: if self.include_rejections {
                    outcome.rejections.clone()
                } else {
                    Vec::new()
                },
            },
            thresholds: analysis.thresholds,
            correlation: analysis.result.clone(),
            summary: analysis.summary.clone(),
            bias: analysis.bias.clone(),
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(&self, analysis: &Analysis) -> Result<String, AnalysisError> {
        let report = self.encode(analysis);
        serde_json::to_string_pretty(&report).map_err(AnalysisError::JsonError)
    }
}

impl AnalysisReport {
    /// Plain-text rendering for terminals and logs
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Correlation Analysis\n");
        out.push_str("====================\n");
        out.push_str(&format!(
            "Records: {} total, {} retained, {} removed\n",
            self.input.total, self.input.retained, self.input.dropped
        ));
        if let (Some(mx), Some(my)) = (self.summary.mean_x, self.summary.mean_y) {
            out.push_str(&format!("Means: x = {mx:.1}, y = {my:.1}\n"));
        }
        out.push_str(&format!(
            "Correlation Coefficient: {:.3}\n",
            self.correlation.coefficient
        ));
        out.push_str(&format!("Interpretation: {}\n", self.correlation.bucket));
        out.push_str(&format!("{}\n", self.correlation.explanation));
        out.push_str("\nPotential bias:\n");
        for note in &self.bias.notes {
            out.push_str(&format!("  - {note}\n"));
        }
        out
    }
}
