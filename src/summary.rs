//! Descriptive statistics for a dataset

use crate::types::Dataset;
use serde::{Deserialize, Serialize};

/// Count, means and extremes of both axes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub count: usize,
    pub mean_x: Option<f64>,
    pub mean_y: Option<f64>,
    pub min_x: Option<f64>,
    pub max_x: Option<f64>,
    pub min_y: Option<f64>,
    pub max_y: Option<f64>,
}

/// Summarize a dataset; every statistic is `None` when it is empty
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    if dataset.is_empty() {
        return DatasetSummary::default();
    }

    let n = dataset.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for s in dataset.iter() {
        sum_x += s.x;
        sum_y += s.y;
        min_x = min_x.min(s.x);
        max_x = max_x.max(s.x);
        min_y = min_y.min(s.y);
        max_y = max_y.max(s.y);
    }

    DatasetSummary {
        count: dataset.len(),
        mean_x: Some(sum_x / n),
        mean_y: Some(sum_y / n),
        min_x: Some(min_x),
        max_x: Some(max_x),
        min_y: Some(min_y),
        max_y: Some(max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary() {
        let dataset = Dataset::from_pairs(&[(18000.0, 17.0), (20000.0, 1.0), (19000.0, 0.0)]);
        let summary = summarize(&dataset);

        assert_eq!(
            summary,
            DatasetSummary {
                count: 3,
                mean_x: Some(19000.0),
                mean_y: Some(6.0),
                min_x: Some(18000.0),
                max_x: Some(20000.0),
                min_y: Some(0.0),
                max_y: Some(17.0),
            }
        );
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(summarize(&Dataset::default()), DatasetSummary::default());
    }
}
