//! Analysis configuration
//!
//! One JSON document selects the inclusion rule per field, the threshold
//! table, the axis labels and the bias check settings. Every field has a
//! default, so `{}` is a valid configuration.

use crate::bias::BiasSettings;
use crate::classify::ThresholdTable;
use crate::error::AnalysisError;
use crate::explain::AxisLabels;
use crate::filter::{FieldRule, InclusionPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub x_rule: FieldRule,
    #[serde(default)]
    pub y_rule: FieldRule,
    #[serde(default)]
    pub thresholds: ThresholdTable,
    #[serde(default)]
    pub labels: AxisLabels,
    #[serde(default)]
    pub bias: BiasSettings,
}

impl AnalysisConfig {
    /// Default configuration with a lenient (0.5) strong cutoff
    pub fn lenient() -> Self {
        Self {
            thresholds: ThresholdTable::LENIENT,
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.labels = AxisLabels::new(x, y);
        self
    }

    pub fn with_rules(mut self, x_rule: FieldRule, y_rule: FieldRule) -> Self {
        self.x_rule = x_rule;
        self.y_rule = y_rule;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn inclusion_policy(&self) -> InclusionPolicy {
        InclusionPolicy::new(self.x_rule, self.y_rule)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.thresholds.validate()?;

        let ratio = self.bias.min_retained_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(AnalysisError::InvalidConfig(format!(
                "bias.min_retained_ratio must be within [0, 1] (got {ratio})"
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(AnalysisError::JsonError)
    }

    /// Read a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        let config = AnalysisConfig::from_json("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.thresholds, ThresholdTable::STANDARD);
        assert!(config.x_rule.strictly_positive);
        assert!(config.y_rule.strictly_positive);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{
            "y_rule": { "strictly_positive": false },
            "thresholds": { "strong": 0.5, "moderate": 0.3 },
            "labels": { "x": "arena capacity", "y": "championship wins" },
            "bias": { "max_group_gap": 3 }
        }"#;
        let config = AnalysisConfig::from_json(json).unwrap();

        assert!(config.x_rule.strictly_positive);
        assert!(!config.y_rule.strictly_positive);
        assert_eq!(config.thresholds, ThresholdTable::LENIENT);
        assert_eq!(config.labels.x.as_deref(), Some("arena capacity"));
        assert_eq!(config.bias.max_group_gap, 3);
        assert_eq!(config.bias.min_retained_ratio, 0.8);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = AnalysisConfig::lenient().with_labels("price", "rating");
        let json = config.to_json().unwrap();
        assert_eq!(AnalysisConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_thresholds = r#"{ "thresholds": { "strong": 0.2, "moderate": 0.3 } }"#;
        assert!(matches!(
            AnalysisConfig::from_json(bad_thresholds),
            Err(AnalysisError::InvalidConfig(_))
        ));

        let bad_ratio = r#"{ "bias": { "min_retained_ratio": 1.5 } }"#;
        assert!(matches!(
            AnalysisConfig::from_json(bad_ratio),
            Err(AnalysisError::InvalidConfig(_))
        ));

        assert!(matches!(
            AnalysisConfig::from_json("not json"),
            Err(AnalysisError::JsonError(_))
        ));
    }
}
