//! Presentation shell: wires scoring outputs into display-ready structures.
//!
//! Nothing here talks to the network or computes anything beyond calling into
//! `scoring`. Both the text report and the TUI render from these types, so the
//! two front-ends always agree.

use serde::Serialize;

use crate::domain::{BatchResult, Label, PredictionResult};
use crate::scoring::{
    RiskTier, Tone, clamp01, compute_global_score, fmt_pct, recommendations, risk_level, top_k,
};

/// Rows of a batch shown at most.
pub const BATCH_DISPLAY_LIMIT: usize = 10;

/// Probability from which an undetected label is flagged as borderline.
pub const WARN_THRESHOLD: f64 = 0.35;

/// The latest result slot. Single and batch results replace each other.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Single(PredictionResult),
    Batch(BatchResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    Empty,
    Single(SingleView),
    Batch(BatchView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleView {
    pub text: String,
    pub global_score: f64,
    pub global_pct: String,
    pub tier: RiskTier,
    pub tier_label: &'static str,
    pub tone: Tone,
    /// Display names of labels predicted positive, in declaration order.
    pub detected: Vec<&'static str>,
    pub recommendations: [String; 3],
    pub top: Vec<LabelCard>,
    pub breakdown: Vec<LabelCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCard {
    pub label: Label,
    pub name: &'static str,
    pub prediction: u8,
    /// Clamped to `[0, 1]`.
    pub probability: f64,
    pub tone: Tone,
}

impl LabelCard {
    fn new(label: Label, prediction: u8, probability: f64) -> Self {
        let p = clamp01(probability);
        Self {
            label,
            name: label.display_name(),
            prediction,
            probability: p,
            tone: progress_tone(prediction, p),
        }
    }

    pub fn is_detected(&self) -> bool {
        self.prediction == 1
    }

    /// Probability with four decimals, e.g. `0.0500`.
    pub fn probability_text(&self) -> String {
        format!("{:.4}", self.probability)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchView {
    pub n_rows: usize,
    pub rows: Vec<BatchRowView>,
    /// More rows came back than are shown.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRowView {
    pub text: String,
    pub flags: Vec<LabelFlag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelFlag {
    pub label: Label,
    pub name: &'static str,
    pub prediction: u8,
}

/// Bar colour for one label.
pub fn progress_tone(prediction: u8, probability: f64) -> Tone {
    if prediction == 1 {
        Tone::Bad
    } else if probability >= WARN_THRESHOLD {
        Tone::Warn
    } else {
        Tone::Ok
    }
}

pub fn render(view: &ResultView, top: usize) -> Rendered {
    match view {
        ResultView::Empty => Rendered::Empty,
        ResultView::Single(result) => Rendered::Single(render_single(result, top)),
        ResultView::Batch(batch) => Rendered::Batch(render_batch(batch)),
    }
}

pub fn render_single(result: &PredictionResult, top: usize) -> SingleView {
    let global_score = compute_global_score(&result.probabilities);
    let tier = risk_level(global_score);

    let detected: Vec<&'static str> = result
        .detected_labels()
        .into_iter()
        .map(Label::display_name)
        .collect();

    let top = top_k(&result.probabilities, top)
        .into_iter()
        .map(|r| LabelCard::new(r.label, result.predictions[r.label], r.probability))
        .collect();

    let breakdown = Label::ALL
        .into_iter()
        .map(|l| LabelCard::new(l, result.predictions[l], result.probabilities[l]))
        .collect();

    SingleView {
        text: result.text.clone(),
        global_score,
        global_pct: fmt_pct(global_score),
        tier,
        tier_label: tier.label(),
        tone: tier.tone(),
        recommendations: recommendations(global_score, detected.as_slice()),
        detected,
        top,
        breakdown,
    }
}

pub fn render_batch(batch: &BatchResult) -> BatchView {
    let rows = batch
        .results
        .iter()
        .take(BATCH_DISPLAY_LIMIT)
        .map(|row| BatchRowView {
            text: row.text.clone(),
            flags: Label::ALL
                .into_iter()
                .map(|label| LabelFlag {
                    label,
                    name: label.display_name(),
                    prediction: row.predictions[label],
                })
                .collect(),
        })
        .collect();

    BatchView {
        n_rows: batch.n_rows,
        rows,
        truncated: batch.results.len() > BATCH_DISPLAY_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LabelMap;

    fn scenario() -> PredictionResult {
        PredictionResult {
            text: "you are an idiot".to_string(),
            probabilities: LabelMap::from_fn(|l| match l {
                Label::Toxic => 0.9,
                Label::SevereToxic => 0.1,
                Label::Obscene => 0.2,
                Label::Threat => 0.0,
                Label::Insult => 0.8,
                Label::IdentityHate => 0.05,
            }),
            predictions: LabelMap::from_fn(|l| u8::from(matches!(l, Label::Toxic | Label::Insult))),
        }
    }

    #[test]
    fn single_view_end_to_end() {
        let view = render_single(&scenario(), 3);

        assert!((view.global_score - 0.3417).abs() < 1e-4);
        assert_eq!(view.global_pct, "34.2%");
        assert_eq!(view.tier, RiskTier::Moderate);
        assert_eq!(view.tier_label, "Modéré");
        assert_eq!(view.tone, Tone::Warn);
        assert_eq!(view.detected, vec!["Toxic", "Insult"]);
        assert_eq!(view.recommendations[2], "Labels détectés : Toxic, Insult");

        let top: Vec<(Label, f64)> = view.top.iter().map(|c| (c.label, c.probability)).collect();
        assert_eq!(
            top,
            vec![(Label::Toxic, 0.9), (Label::Insult, 0.8), (Label::Obscene, 0.2)]
        );
    }

    #[test]
    fn breakdown_covers_all_labels_with_tones() {
        let view = render_single(&scenario(), 3);
        assert_eq!(view.breakdown.len(), Label::COUNT);

        let toxic = &view.breakdown[0];
        assert!(toxic.is_detected());
        assert_eq!(toxic.tone, Tone::Bad);
        assert_eq!(toxic.probability_text(), "0.9000");

        let hate = &view.breakdown[5];
        assert_eq!(hate.label, Label::IdentityHate);
        assert_eq!(hate.probability_text(), "0.0500");
        assert_eq!(hate.tone, Tone::Ok);
    }

    #[test]
    fn progress_tone_thresholds() {
        assert_eq!(progress_tone(1, 0.01), Tone::Bad);
        assert_eq!(progress_tone(0, 0.35), Tone::Warn);
        assert_eq!(progress_tone(0, 0.3499), Tone::Ok);
    }

    #[test]
    fn breakdown_clamps_bad_probabilities() {
        let mut result = scenario();
        result.probabilities[Label::Threat] = f64::NAN;
        result.probabilities[Label::Obscene] = 1.4;

        let view = render_single(&result, 3);
        assert_eq!(view.breakdown[3].probability, 0.0);
        assert_eq!(view.breakdown[2].probability_text(), "1.0000");
        assert_eq!(view.breakdown[2].tone, Tone::Warn);
    }

    fn batch_of(n: usize) -> BatchResult {
        let results = (0..n)
            .map(|i| PredictionResult {
                text: format!("row {i}"),
                probabilities: LabelMap::default(),
                predictions: LabelMap::from_fn(|l| u8::from(i % 2 == 0 && l == Label::Threat)),
            })
            .collect();
        BatchResult { n_rows: n, results }
    }

    #[test]
    fn batch_view_caps_rows() {
        let view = render_batch(&batch_of(15));
        assert_eq!(view.n_rows, 15);
        assert_eq!(view.rows.len(), BATCH_DISPLAY_LIMIT);
        assert!(view.truncated);
        assert_eq!(view.rows[9].text, "row 9");
    }

    #[test]
    fn small_batch_is_not_truncated() {
        let view = render_batch(&batch_of(3));
        assert_eq!(view.rows.len(), 3);
        assert!(!view.truncated);

        let flags: Vec<u8> = view.rows[0].flags.iter().map(|f| f.prediction).collect();
        assert_eq!(flags, vec![0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn render_dispatches_on_slot() {
        assert_eq!(render(&ResultView::Empty, 3), Rendered::Empty);
        assert!(matches!(
            render(&ResultView::Single(scenario()), 3),
            Rendered::Single(_)
        ));
        assert!(matches!(
            render(&ResultView::Batch(batch_of(1)), 3),
            Rendered::Batch(_)
        ));
    }

    #[test]
    fn rendered_serializes_with_kind_tag() {
        let json = serde_json::to_value(render(&ResultView::Single(scenario()), 3)).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["tier"], "moderate");
        assert_eq!(json["top"][0]["label"], "toxic");
    }
}
