//! Global risk score.

use crate::domain::{Label, Probabilities};
use crate::scoring::clamp01;

/// Unweighted mean of the six clamped label probabilities.
///
/// Every label weighs the same regardless of severity. Changing this to a max or
/// a weighted sum would shift every tier boundary downstream.
pub fn compute_global_score(probabilities: &Probabilities) -> f64 {
    let sum: f64 = probabilities.values().map(|&p| clamp01(p)).sum();
    sum / Label::COUNT as f64
}
