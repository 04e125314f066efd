//! Pipeline orchestration
//!
//! This module provides the public API for Correlation Lens.
//! It orchestrates the full pipeline from raw records to a report.

use crate::bias::{analyze_bias, BiasReport};
use crate::classify::ThresholdTable;
use crate::config::AnalysisConfig;
use crate::correlation::compute_correlation;
use crate::encoder::{AnalysisReport, ReportEncoder};
use crate::error::AnalysisError;
use crate::explain::Explainer;
use crate::filter::{filter_valid, FilterOutcome};
use crate::sink::ResultSink;
use crate::sources::{DataSource, InputFormat};
use crate::summary::{summarize, DatasetSummary};
use crate::types::{CorrelationResult, RawRecord};
use tracing::{debug, info, warn};

/// Everything derived from one batch of raw records
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub outcome: FilterOutcome,
    pub result: CorrelationResult,
    pub summary: DatasetSummary,
    pub bias: BiasReport,
    pub thresholds: ThresholdTable,
}

/// Convert raw record text to a JSON report (stateless, one-shot).
///
/// # Arguments
/// * `input` - Records in the given layout
/// * `format` - Layout of `input`
/// * `config_json` - Optional configuration document; defaults apply when `None`
///
/// # Example
/// ```ignore
/// let report = analyze_json(records_json, InputFormat::Json, None)?;
/// ```
pub fn analyze_json(
    input: String,
    format: InputFormat,
    config_json: Option<String>,
) -> Result<String, AnalysisError> {
    let config = match config_json {
        Some(json) => AnalysisConfig::from_json(&json)?,
        None => AnalysisConfig::default(),
    };

    let analyzer = CorrelationAnalyzer::new(config)?;
    let records = format.parse(&input)?;
    let analysis = analyzer.analyze(&records);
    analyzer.encoder.encode_to_json(&analysis)
}

/// Correlate two aligned columns with the default configuration.
///
/// Pairs are formed by position; values failing the default inclusion rule
/// (both strictly positive) are dropped before computing.
pub fn analyze_pairs(xs: &[f64], ys: &[f64]) -> CorrelationResult {
    let records: Vec<RawRecord> = xs
        .iter()
        .zip(ys.iter())
        .map(|(&x, &y)| RawRecord::new(Some(x), Some(y)))
        .collect();

    let config = AnalysisConfig::default();
    let outcome = filter_valid(&records, &config.inclusion_policy());
    correlate(&outcome, &config.thresholds, &Explainer::default())
}

/// Coefficient, bucket and explanation for a filtered dataset
fn correlate(
    outcome: &FilterOutcome,
    thresholds: &ThresholdTable,
    explainer: &Explainer,
) -> CorrelationResult {
    let coefficient = compute_correlation(&outcome.dataset);
    let bucket = thresholds.classify(coefficient);

    CorrelationResult {
        coefficient,
        bucket,
        explanation: explainer.explain(bucket),
        sample_count: outcome.dataset.len(),
    }
}

/// Why a dataset can only produce the sentinel coefficient 0
fn degenerate_reason(summary: &DatasetSummary) -> Option<&'static str> {
    if summary.count < 2 {
        Some("fewer than two valid samples")
    } else if summary.min_x == summary.max_x {
        Some("x values are constant")
    } else if summary.min_y == summary.max_y {
        Some("y values are constant")
    } else {
        None
    }
}

/// Analyzer bound to one configuration.
///
/// Holds no state between calls; every analysis is recomputed in full.
pub struct CorrelationAnalyzer {
    config: AnalysisConfig,
    explainer: Explainer,
    encoder: ReportEncoder,
}

impl CorrelationAnalyzer {
    /// Create an analyzer, rejecting invalid configurations
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            explainer: Explainer::new(config.labels.clone()),
            encoder: ReportEncoder::new(),
            config,
        })
    }

    /// Replace the report encoder (e.g. to pin the instance ID)
    pub fn with_encoder(mut self, encoder: ReportEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn encoder(&self) -> &ReportEncoder {
        &self.encoder
    }

    /// Run every stage over a batch of raw records.
    ///
    /// Pipeline stages:
    /// 1. filter_valid - Drop records failing the inclusion policy
    /// 2. compute_correlation - Pearson coefficient
    /// 3. classify / explain - Bucket and explanation text
    /// 4. summarize / analyze_bias - Descriptive stats and bias findings
    pub fn analyze(&self, records: &[RawRecord]) -> Analysis {
        let outcome = filter_valid(records, &self.config.inclusion_policy());
        let summary = summarize(&outcome.dataset);

        if let Some(reason) = degenerate_reason(&summary) {
            warn!(samples = summary.count, reason, "degenerate input; reporting 0");
        }

        let result = correlate(&outcome, &self.config.thresholds, &self.explainer);
        debug!(
            coefficient = result.coefficient,
            bucket = result.bucket.as_str(),
            "classified coefficient"
        );

        let bias = analyze_bias(&outcome, &self.config.bias);

        info!(
            total = outcome.total(),
            retained = outcome.retained(),
            coefficient = result.coefficient,
            bucket = result.bucket.as_str(),
            "correlation analysis complete"
        );

        Analysis {
            outcome,
            result,
            summary,
            bias,
            thresholds: self.config.thresholds,
        }
    }

    /// Load records from a source and analyze them
    pub fn analyze_source(&self, source: &dyn DataSource) -> Result<Analysis, AnalysisError> {
        let records = source.load()?;
        Ok(self.analyze(&records))
    }

    /// Encode an analysis with this analyzer's encoder
    pub fn report(&self, analysis: &Analysis) -> AnalysisReport {
        self.encoder.encode(analysis)
    }

    /// Load, analyze, encode and publish in one step
    pub fn run(
        &self,
        source: &dyn DataSource,
        sink: &mut dyn ResultSink,
    ) -> Result<AnalysisReport, AnalysisError> {
        let analysis = self.analyze_source(source)?;
        let report = self.report(&analysis);
        sink.publish(&report)?;
        Ok(report)
    }
}
