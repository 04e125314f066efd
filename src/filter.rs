//! Record filtering
//!
//! This module turns raw records into a validated dataset.
//! - Missing and non-numeric components are rejected
//! - Non-finite values are rejected
//! - Each field is checked against its own inclusion rule (`> 0` or `>= 0`)

use crate::types::{Dataset, RawRecord, RejectReason, Rejection, Sample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusion rule for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// `true` requires `value > 0`, `false` requires `value >= 0`
    pub strictly_positive: bool,
}

impl Default for FieldRule {
    fn default() -> Self {
        Self::STRICTLY_POSITIVE
    }
}

impl FieldRule {
    pub const STRICTLY_POSITIVE: FieldRule = FieldRule {
        strictly_positive: true,
    };

    pub const NON_NEGATIVE: FieldRule = FieldRule {
        strictly_positive: false,
    };

    pub fn accepts(&self, value: f64) -> bool {
        if self.strictly_positive {
            value > 0.0
        } else {
            value >= 0.0
        }
    }
}

/// Per-field inclusion policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionPolicy {
    pub x: FieldRule,
    pub y: FieldRule,
}

impl InclusionPolicy {
    pub fn new(x: FieldRule, y: FieldRule) -> Self {
        Self { x, y }
    }

    /// Check one record, returning the first reason it fails
    pub fn check(&self, record: &RawRecord) -> Result<(f64, f64), RejectReason> {
        let x = record.x.ok_or(RejectReason::MissingX)?;
        let y = record.y.ok_or(RejectReason::MissingY)?;

        if !x.is_finite() {
            return Err(RejectReason::NonFiniteX);
        }
        if !y.is_finite() {
            return Err(RejectReason::NonFiniteY);
        }
        if !self.x.accepts(x) {
            return Err(RejectReason::XOutOfRange);
        }
        if !self.y.accepts(y) {
            return Err(RejectReason::YOutOfRange);
        }

        Ok((x, y))
    }
}

/// Result of filtering a batch of raw records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub dataset: Dataset,
    pub rejections: Vec<Rejection>,
}

impl FilterOutcome {
    /// Number of raw records that went in
    pub fn total(&self) -> usize {
        self.dataset.len() + self.rejections.len()
    }

    pub fn retained(&self) -> usize {
        self.dataset.len()
    }

    pub fn dropped(&self) -> usize {
        self.rejections.len()
    }
}

/// Keep the records that pass `policy`, preserving order and duplicates
pub fn filter_valid(raw: &[RawRecord], policy: &InclusionPolicy) -> FilterOutcome {
    let mut samples = Vec::with_capacity(raw.len());
    let mut rejections = Vec::new();

    for (index, record) in raw.iter().enumerate() {
        match policy.check(record) {
            Ok((x, y)) => samples.push(Sample {
                x,
                y,
                label: record.label.clone(),
                group: record.group.clone(),
            }),
            Err(reason) => rejections.push(Rejection {
                index,
                reason,
                label: record.label.clone(),
            }),
        }
    }

    debug!(
        total = raw.len(),
        retained = samples.len(),
        dropped = rejections.len(),
        "filtered raw records"
    );

    FilterOutcome {
        dataset: Dataset::new(samples),
        rejections,
    }
}
