//! Label ranking by probability.

use serde::Serialize;

use crate::domain::{Label, Probabilities};
use crate::scoring::clamp01;

pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedLabel {
    pub label: Label,
    pub probability: f64,
}

/// The `k` most probable labels, highest first.
///
/// The sort is stable, so equal probabilities keep declaration order. Asking for
/// more than six labels returns all six.
pub fn top_k(probabilities: &Probabilities, k: usize) -> Vec<RankedLabel> {
    let mut items: Vec<RankedLabel> = probabilities
        .iter()
        .map(|(label, &p)| RankedLabel {
            label,
            probability: clamp01(p),
        })
        .collect();

    items.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(k);
    items
}
