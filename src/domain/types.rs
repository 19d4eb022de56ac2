//! API payload types.
//!
//! The backend is loosely typed, so payloads are decoded through permissive
//! "raw" shapes and normalized on the way in:
//!
//! - a label missing from `probabilities` reads as 0
//! - a non-numeric probability is kept as NaN and clamped to 0 wherever it is used
//! - a prediction counts as positive only when it is exactly the number 1

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Label, LabelMap};
use crate::scoring::coerce_number;

/// Raw per-label probabilities as received (not clamped).
pub type Probabilities = LabelMap<f64>;

/// Binary per-label decisions (0 or 1).
pub type Predictions = LabelMap<u8>;

/// Result of one `/predict` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPrediction")]
pub struct PredictionResult {
    pub text: String,
    pub probabilities: Probabilities,
    pub predictions: Predictions,
}

impl PredictionResult {
    pub fn is_detected(&self, label: Label) -> bool {
        self.predictions[label] == 1
    }

    /// Labels whose prediction flag is 1, in declaration order.
    pub fn detected_labels(&self) -> Vec<Label> {
        Label::ALL
            .into_iter()
            .filter(|&l| self.is_detected(l))
            .collect()
    }
}

/// One row of a batch response. Same fields as a single prediction.
pub type BatchRow = PredictionResult;

/// Result of one `/predict_batch` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBatch")]
pub struct BatchResult {
    pub n_rows: usize,
    pub results: Vec<BatchRow>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl HealthStatus {
    /// What the dashboard shows when the health check itself fails.
    pub fn unreachable() -> Self {
        Self {
            status: "error".to_string(),
            model_loaded: false,
            model_path: None,
            labels: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model_loaded
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPrediction {
    #[serde(default)]
    text: Value,
    #[serde(default)]
    probabilities: Value,
    #[serde(default)]
    predictions: Value,
}

impl From<RawPrediction> for PredictionResult {
    fn from(raw: RawPrediction) -> Self {
        let probs = as_object(&raw.probabilities);
        let preds = as_object(&raw.predictions);

        Self {
            text: match raw.text {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            },
            probabilities: LabelMap::from_fn(|l| {
                probs
                    .and_then(|m| m.get(l.id()))
                    .map(coerce_number)
                    .unwrap_or(0.0)
            }),
            predictions: LabelMap::from_fn(|l| {
                let positive = preds
                    .and_then(|m| m.get(l.id()))
                    .and_then(Value::as_f64)
                    .is_some_and(|v| v == 1.0);
                u8::from(positive)
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBatch {
    #[serde(default)]
    n_rows: Value,
    #[serde(default)]
    results: Value,
}

impl From<RawBatch> for BatchResult {
    fn from(raw: RawBatch) -> Self {
        let results: Vec<BatchRow> = match raw.results {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| {
                    serde_json::from_value::<RawPrediction>(row)
                        .unwrap_or_default()
                        .into()
                })
                .collect(),
            _ => Vec::new(),
        };

        let n_rows = raw
            .n_rows
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(results.len());

        Self { n_rows, results }
    }
}

fn as_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_decodes_full_payload() {
        let json = r#"{
            "text": "you are stupid",
            "predictions": {"toxic": 1, "severe_toxic": 0, "obscene": 0, "threat": 0, "insult": 1, "identity_hate": 0},
            "probabilities": {"toxic": 0.9, "severe_toxic": 0.1, "obscene": 0.2, "threat": 0.0, "insult": 0.8, "identity_hate": 0.05}
        }"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.text, "you are stupid");
        assert_eq!(result.probabilities[Label::Toxic], 0.9);
        assert_eq!(result.probabilities[Label::IdentityHate], 0.05);
        assert_eq!(result.detected_labels(), vec![Label::Toxic, Label::Insult]);
    }

    #[test]
    fn missing_keys_default_to_zero() {
        let json = r#"{"text": "hi", "probabilities": {"toxic": 0.4}, "predictions": {}}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.probabilities[Label::Toxic], 0.4);
        for label in &Label::ALL[1..] {
            assert_eq!(result.probabilities[*label], 0.0);
        }
        assert!(result.detected_labels().is_empty());
    }

    #[test]
    fn missing_maps_do_not_fail() {
        let result: PredictionResult = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(result.probabilities, LabelMap::default());
        assert_eq!(result.predictions, LabelMap::default());
    }

    #[test]
    fn non_numeric_probability_is_kept_as_nan() {
        let json = r#"{"text": "x", "probabilities": {"toxic": "oops", "insult": "0.5", "threat": null}}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();

        assert!(result.probabilities[Label::Toxic].is_nan());
        assert_eq!(result.probabilities[Label::Insult], 0.5);
        assert_eq!(result.probabilities[Label::Threat], 0.0);
    }

    #[test]
    fn only_numeric_one_counts_as_detected() {
        let json = r#"{"text": "x", "predictions": {"toxic": 1.0, "insult": "1", "threat": true, "obscene": 2}}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.detected_labels(), vec![Label::Toxic]);
    }

    #[test]
    fn batch_decodes_rows_and_count() {
        let json = r#"{
            "n_rows": 2,
            "results": [
                {"text": "a", "predictions": {"toxic": 1}, "probabilities": {"toxic": 0.7}},
                {"text": "b"}
            ]
        }"#;
        let batch: BatchResult = serde_json::from_str(json).unwrap();

        assert_eq!(batch.n_rows, 2);
        assert_eq!(batch.results.len(), 2);
        assert!(batch.results[0].is_detected(Label::Toxic));
        assert_eq!(batch.results[1].text, "b");
    }

    #[test]
    fn batch_without_count_uses_row_count() {
        let batch: BatchResult = serde_json::from_str(r#"{"results": [{"text": "a"}]}"#).unwrap();
        assert_eq!(batch.n_rows, 1);

        let empty: BatchResult = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.n_rows, 0);
        assert!(empty.results.is_empty());
    }

    #[test]
    fn health_tolerates_extra_and_missing_fields() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "ok", "model_loaded": true, "model_path": "models/m.joblib", "labels": ["toxic"], "uptime": 3}"#,
        )
        .unwrap();
        assert!(health.is_ready());
        assert_eq!(health.model_path.as_deref(), Some("models/m.joblib"));

        let bare: HealthStatus = serde_json::from_str("{}").unwrap();
        assert!(!bare.is_ready());
    }
}
