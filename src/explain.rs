//! Human-readable explanations
//!
//! Canned sentences per bucket, plus an [`Explainer`] that names the two
//! variables when labels are known.

use crate::types::CorrelationBucket;
use serde::{Deserialize, Serialize};

/// Canned explanation for a bucket
pub fn explain(bucket: CorrelationBucket) -> &'static str {
    match bucket {
        CorrelationBucket::StrongPositive => {
            "The two variables rise together closely: higher x values reliably go with higher y values."
        }
        CorrelationBucket::ModeratePositive => {
            "Higher x values tend to go with higher y values, though with noticeable exceptions."
        }
        CorrelationBucket::Weak => {
            "There is little linear relationship between the two variables; x does not predict y."
        }
        CorrelationBucket::ModerateNegative => {
            "Higher x values tend to go with lower y values, though with noticeable exceptions."
        }
        CorrelationBucket::StrongNegative => {
            "The two variables move in opposite directions closely: higher x values reliably go with lower y values."
        }
    }
}

/// Axis names used in labeled explanations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabels {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
}

impl AxisLabels {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
        }
    }
}

/// Produces explanation text, naming the variables when both labels are set
#[derive(Debug, Clone, Default)]
pub struct Explainer {
    labels: AxisLabels,
}

impl Explainer {
    pub fn new(labels: AxisLabels) -> Self {
        Self { labels }
    }

    pub fn explain(&self, bucket: CorrelationBucket) -> String {
        let (x, y) = match (&self.labels.x, &self.labels.y) {
            (Some(x), Some(y)) => (x.as_str(), y.as_str()),
            _ => return explain(bucket).to_string(),
        };

        match bucket {
            CorrelationBucket::StrongPositive => {
                format!("This suggests that higher {x} reliably goes with higher {y}.")
            }
            CorrelationBucket::ModeratePositive => {
                format!("This suggests that higher {x} tends to go with higher {y}.")
            }
            CorrelationBucket::Weak => {
                format!("This suggests there is little relationship between {x} and {y}.")
            }
            CorrelationBucket::ModerateNegative => {
                format!("This suggests that higher {x} tends to go with lower {y}.")
            }
            CorrelationBucket::StrongNegative => {
                format!("This suggests that higher {x} reliably goes with lower {y}.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CorrelationBucket; 5] = [
        CorrelationBucket::StrongPositive,
        CorrelationBucket::ModeratePositive,
        CorrelationBucket::Weak,
        CorrelationBucket::ModerateNegative,
        CorrelationBucket::StrongNegative,
    ];

    #[test]
    fn test_every_bucket_has_distinct_text() {
        let texts: std::collections::HashSet<&str> = ALL.iter().map(|b| explain(*b)).collect();
        assert_eq!(texts.len(), ALL.len());
    }

    #[test]
    fn test_explain_is_stable() {
        for bucket in ALL {
            assert_eq!(explain(bucket), explain(bucket));
        }
    }

    #[test]
    fn test_labeled_explanation() {
        let explainer = Explainer::new(AxisLabels::new("arena capacity", "championship wins"));
        assert_eq!(
            explainer.explain(CorrelationBucket::ModeratePositive),
            "This suggests that higher arena capacity tends to go with higher championship wins."
        );
        assert_eq!(
            explainer.explain(CorrelationBucket::Weak),
            "This suggests there is little relationship between arena capacity and championship wins."
        );
    }

    #[test]
    fn test_partial_labels_fall_back() {
        let explainer = Explainer::new(AxisLabels {
            x: Some("price".to_string()),
            y: None,
        });
        assert_eq!(
            explainer.explain(CorrelationBucket::StrongNegative),
            explain(CorrelationBucket::StrongNegative)
        );
    }
}
