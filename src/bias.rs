//! Data bias analysis
//!
//! Flags properties of the filtered data that should temper how a
//! correlation is read:
//! - Selection bias from records dropped by the filter
//! - Uneven group representation
//! - The range the x values actually cover

use crate::filter::FilterOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Default share of records that must survive filtering
pub const DEFAULT_MIN_RETAINED_RATIO: f64 = 0.8;

/// Default largest tolerated gap between group sizes
pub const DEFAULT_MAX_GROUP_GAP: usize = 5;

/// Bias check settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasSettings {
    #[serde(default = "default_min_retained_ratio")]
    pub min_retained_ratio: f64,
    #[serde(default = "default_max_group_gap")]
    pub max_group_gap: usize,
}

fn default_min_retained_ratio() -> f64 {
    DEFAULT_MIN_RETAINED_RATIO
}

fn default_max_group_gap() -> usize {
    DEFAULT_MAX_GROUP_GAP
}

impl Default for BiasSettings {
    fn default() -> Self {
        Self {
            min_retained_ratio: DEFAULT_MIN_RETAINED_RATIO,
            max_group_gap: DEFAULT_MAX_GROUP_GAP,
        }
    }
}

/// How filtering changed the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionBias {
    pub total: usize,
    pub retained: usize,
    pub dropped: usize,
    /// `retained / total`, 1.0 for empty input
    pub retained_ratio: f64,
    pub flagged: bool,
}

/// Sample counts per group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBalance {
    pub counts: BTreeMap<String, usize>,
    /// Samples without a group
    pub ungrouped: usize,
    /// Largest minus smallest group size
    pub max_gap: usize,
    pub balanced: bool,
}

/// Findings about possible bias in the analysed data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    pub selection: SelectionBias,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_balance: Option<GroupBalance>,
    /// `(min, max)` of the retained x values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_range: Option<(f64, f64)>,
    /// Retained samples with `y > 0`
    pub y_positive_count: usize,
    pub notes: Vec<String>,
}

impl BiasReport {
    pub fn has_findings(&self) -> bool {
        self.selection.flagged
            || self
                .group_balance
                .as_ref()
                .map(|g| !g.balanced)
                .unwrap_or(false)
    }
}

/// Analyse a filter outcome for selection bias, group balance and coverage
pub fn analyze_bias(outcome: &FilterOutcome, settings: &BiasSettings) -> BiasReport {
    let mut notes = Vec::new();

    let selection = selection_bias(outcome, settings);
    if selection.flagged {
        notes.push(format!(
            "Selection bias: {} of {} records were removed; results may be skewed if the removed records follow a different pattern.",
            selection.dropped, selection.total
        ));
        warn!(
            dropped = selection.dropped,
            total = selection.total,
            "filtering removed a large share of records"
        );
    } else if selection.dropped > 0 {
        notes.push(format!(
            "Minimal selection bias: {} of {} records were retained.",
            selection.retained, selection.total
        ));
    } else {
        notes.push("No records were removed by filtering.".to_string());
    }

    let group_balance = group_balance(outcome, settings);
    if let Some(balance) = &group_balance {
        let listing = balance
            .counts
            .iter()
            .map(|(name, count)| format!("{count} {name}"))
            .collect::<Vec<_>>()
            .join(", ");
        if balance.balanced {
            notes.push(format!("Group distribution: {listing}. Groups are balanced."));
        } else {
            notes.push(format!(
                "Group distribution: {listing}. Uneven representation may affect results."
            ));
        }
    }

    let x_range = x_range(outcome);
    if let Some((min, max)) = x_range {
        notes.push(format!("x values range from {min} to {max}."));
    }

    let y_positive_count = outcome.dataset.iter().filter(|s| s.y > 0.0).count();
    if !outcome.dataset.is_empty() {
        notes.push(format!(
            "{} of {} samples have a positive y value.",
            y_positive_count,
            outcome.dataset.len()
        ));
    }

    BiasReport {
        selection,
        group_balance,
        x_range,
        y_positive_count,
        notes,
    }
}

fn selection_bias(outcome: &FilterOutcome, settings: &BiasSettings) -> SelectionBias {
    let total = outcome.total();
    let retained = outcome.retained();
    let retained_ratio = if total == 0 {
        1.0
    } else {
        retained as f64 / total as f64
    };

    SelectionBias {
        total,
        retained,
        dropped: outcome.dropped(),
        retained_ratio,
        flagged: total > 0 && (retained as f64) < settings.min_retained_ratio * total as f64,
    }
}

fn group_balance(outcome: &FilterOutcome, settings: &BiasSettings) -> Option<GroupBalance> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut ungrouped = 0;

    for sample in outcome.dataset.iter() {
        match &sample.group {
            Some(group) => *counts.entry(group.clone()).or_insert(0) += 1,
            None => ungrouped += 1,
        }
    }

    if counts.is_empty() {
        return None;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    let min = counts.values().copied().min().unwrap_or(0);
    let max_gap = max - min;

    Some(GroupBalance {
        counts,
        ungrouped,
        max_gap,
        balanced: max_gap <= settings.max_group_gap,
    })
}

fn x_range(outcome: &FilterOutcome) -> Option<(f64, f64)> {
    outcome.dataset.iter().fold(None, |acc, s| match acc {
        None => Some((s.x, s.x)),
        Some((min, max)) => Some((min.min(s.x), max.max(s.x))),
    })
}
