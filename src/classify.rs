//! Coefficient classification
//!
//! Maps a coefficient onto a strength/direction bucket through a threshold
//! ladder evaluated top-down. The ladder is symmetric around zero and is
//! parameterised by a [`ThresholdTable`] chosen per deployment.

use crate::error::AnalysisError;
use crate::types::CorrelationBucket;
use serde::{Deserialize, Serialize};

/// Cutoffs for the classification ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    /// |r| above this is "strong"
    pub strong: f64,
    /// |r| above this (and not strong) is "moderate"
    pub moderate: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl ThresholdTable {
    /// 0.7 / 0.3 ladder
    pub const STANDARD: ThresholdTable = ThresholdTable {
        strong: 0.7,
        moderate: 0.3,
    };

    /// 0.5 / 0.3 ladder
    pub const LENIENT: ThresholdTable = ThresholdTable {
        strong: 0.5,
        moderate: 0.3,
    };

    pub fn new(strong: f64, moderate: f64) -> Result<Self, AnalysisError> {
        let table = Self { strong, moderate };
        table.validate()?;
        Ok(table)
    }

    /// Require `0 <= moderate < strong <= 1`
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.strong.is_finite() || !self.moderate.is_finite() {
            return Err(AnalysisError::InvalidConfig(
                "thresholds must be finite".to_string(),
            ));
        }
        if self.moderate < 0.0 || self.strong > 1.0 || self.moderate >= self.strong {
            return Err(AnalysisError::InvalidConfig(format!(
                "thresholds must satisfy 0 <= moderate < strong <= 1 (got moderate={}, strong={})",
                self.moderate, self.strong
            )));
        }
        Ok(())
    }

    /// Classify a coefficient; first matching rung wins
    pub fn classify(&self, r: f64) -> CorrelationBucket {
        if r > self.strong {
            CorrelationBucket::StrongPositive
        } else if r > self.moderate {
            CorrelationBucket::ModeratePositive
        } else if r > -self.moderate {
            CorrelationBucket::Weak
        } else if r > -self.strong {
            CorrelationBucket::ModerateNegative
        } else {
            CorrelationBucket::StrongNegative
        }
    }
}

/// Classify a coefficient with the given table
pub fn classify(coefficient: f64, table: &ThresholdTable) -> CorrelationBucket {
    table.classify(coefficient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ladder() {
        let t = ThresholdTable::STANDARD;
        assert_eq!(classify(1.0, &t), CorrelationBucket::StrongPositive);
        assert_eq!(classify(0.71, &t), CorrelationBucket::StrongPositive);
        assert_eq!(classify(0.7, &t), CorrelationBucket::ModeratePositive);
        assert_eq!(classify(0.31, &t), CorrelationBucket::ModeratePositive);
        assert_eq!(classify(0.3, &t), CorrelationBucket::Weak);
        assert_eq!(classify(0.0, &t), CorrelationBucket::Weak);
        assert_eq!(classify(-0.29, &t), CorrelationBucket::Weak);
        assert_eq!(classify(-0.3, &t), CorrelationBucket::ModerateNegative);
        assert_eq!(classify(-0.69, &t), CorrelationBucket::ModerateNegative);
        assert_eq!(classify(-0.7, &t), CorrelationBucket::StrongNegative);
        assert_eq!(classify(-1.0, &t), CorrelationBucket::StrongNegative);
    }

    #[test]
    fn test_lenient_ladder() {
        let t = ThresholdTable::LENIENT;
        assert_eq!(classify(0.6, &t), CorrelationBucket::StrongPositive);
        assert_eq!(classify(0.45, &t), CorrelationBucket::ModeratePositive);
        assert_eq!(classify(-0.6, &t), CorrelationBucket::StrongNegative);
        // The two tables disagree in the 0.5..0.7 band
        assert_eq!(
            classify(0.6, &ThresholdTable::STANDARD),
            CorrelationBucket::ModeratePositive
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let t = ThresholdTable::STANDARD;
        for r in [-0.95, -0.5, -0.1, 0.2, 0.55, 0.88] {
            assert_eq!(classify(r, &t), classify(r, &t));
        }
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(ThresholdTable::new(0.3, 0.7).is_err());
        assert!(ThresholdTable::new(0.5, 0.5).is_err());
        assert!(ThresholdTable::new(1.2, 0.3).is_err());
        assert!(ThresholdTable::new(0.7, -0.1).is_err());
        assert!(ThresholdTable::new(f64::NAN, 0.3).is_err());
        assert!(ThresholdTable::new(0.8, 0.4).is_ok());
    }
}
