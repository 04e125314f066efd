//! Correlation Lens - On-device correlation analysis for paired numeric data
//!
//! Lens turns two aligned numeric columns into an interpreted correlation
//! through a deterministic pipeline: record filtering → Pearson coefficient
//! → strength/direction bucket → explanation → summary and bias report.
//!
//! ## Modules
//!
//! - **Core**: `filter`, `correlation`, `classify`, `explain`
//! - **Context**: `summary` and `bias` findings that accompany a coefficient
//! - **I/O seams**: `sources` (record loading) and `sink` (report delivery)

pub mod bias;
pub mod classify;
pub mod config;
pub mod correlation;
pub mod encoder;
pub mod error;
pub mod explain;
pub mod filter;
pub mod pipeline;
pub mod sink;
pub mod sources;
pub mod summary;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use classify::{classify, ThresholdTable};
pub use config::AnalysisConfig;
pub use correlation::{compute_correlation, correlation_of};
pub use error::AnalysisError;
pub use explain::explain;
pub use filter::{filter_valid, FieldRule, InclusionPolicy};
pub use pipeline::{analyze_json, analyze_pairs, Analysis, CorrelationAnalyzer};
pub use sink::ResultSink;
pub use sources::{DataSource, InputFormat};
pub use types::{CorrelationBucket, CorrelationResult, Dataset, RawRecord, Sample};

/// Lens version embedded in all reports
pub const LENS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "correlation-lens";
