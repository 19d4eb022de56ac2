//! HTTP client for the three API endpoints.

use std::path::Path;

use reqwest::blocking::{Client, Response, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Settings;
use crate::domain::{BatchResult, HealthStatus, PredictionResult};
use crate::error::AppError;

pub const HEALTH_PATH: &str = "/health";
pub const PREDICT_PATH: &str = "/predict";
pub const PREDICT_BATCH_PATH: &str = "/predict_batch";

/// Shown when the API fails without a usable `detail`.
pub const PREDICT_FALLBACK: &str = "Erreur API /predict";
pub const PREDICT_BATCH_FALLBACK: &str = "Erreur API /predict_batch";

/// Operations the dashboard needs from the classification backend.
pub trait ToxicityApi {
    /// Never fails: an unreachable or broken backend reads as "not ready".
    fn health(&self) -> HealthStatus;

    fn predict(&self, text: &str) -> Result<PredictionResult, AppError>;

    fn predict_batch(&self, csv_path: &Path) -> Result<BatchResult, AppError>;
}

pub struct ApiClient {
    client: Client,
    settings: Settings,
}

impl ApiClient {
    /// Requests wait for the server as long as it takes: no client-side timeout.
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| AppError::usage(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.api_url
    }

    fn fetch_health(&self) -> Result<HealthStatus, AppError> {
        let url = self.settings.endpoint(HEALTH_PATH);
        tracing::debug!(%url, "checking API health");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::api(format!("Health request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::api(format!(
                "Health check failed with status {}.",
                resp.status()
            )));
        }
        resp.json()
            .map_err(|e| AppError::api(format!("Failed to parse health response: {e}")))
    }
}

impl ToxicityApi for ApiClient {
    fn health(&self) -> HealthStatus {
        match self.fetch_health() {
            Ok(health) => {
                tracing::info!(status = %health.status, model_loaded = health.model_loaded, "API health");
                health
            }
            Err(err) => {
                tracing::warn!(error = %err, "API health check failed");
                HealthStatus::unreachable()
            }
        }
    }

    fn predict(&self, text: &str) -> Result<PredictionResult, AppError> {
        let url = self.settings.endpoint(PREDICT_PATH);
        tracing::debug!(%url, chars = text.chars().count(), "sending text");

        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .map_err(|e| transport_error(&url, e, PREDICT_FALLBACK))?;

        let result: PredictionResult = decode(resp, PREDICT_FALLBACK)?;
        tracing::info!(detected = result.detected_labels().len(), "prediction received");
        Ok(result)
    }

    fn predict_batch(&self, csv_path: &Path) -> Result<BatchResult, AppError> {
        let url = self.settings.endpoint(PREDICT_BATCH_PATH);
        tracing::debug!(%url, file = %csv_path.display(), "uploading CSV");

        let form = multipart::Form::new().file("file", csv_path).map_err(|e| {
            AppError::usage(format!(
                "Failed to read CSV '{}': {e}",
                csv_path.display()
            ))
        })?;

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| transport_error(&url, e, PREDICT_BATCH_FALLBACK))?;

        let batch: BatchResult = decode(resp, PREDICT_BATCH_FALLBACK)?;
        tracing::info!(n_rows = batch.n_rows, "batch received");
        Ok(batch)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

fn decode<T: DeserializeOwned>(resp: Response, fallback: &str) -> Result<T, AppError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        let message = error_message(&body, fallback);
        tracing::warn!(%status, %message, "API returned an error");
        return Err(AppError::api(message));
    }

    resp.json().map_err(|e| {
        tracing::warn!(error = %e, "failed to decode API response");
        AppError::api(fallback)
    })
}

fn transport_error(url: &str, err: reqwest::Error, fallback: &str) -> AppError {
    tracing::warn!(%url, error = %err, "request failed");
    AppError::api(fallback)
}

/// The server's `detail` string when it sent a non-empty one, else `fallback`.
///
/// Whitespace-only details are shown as sent.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| match d {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| fallback.to_string())
}
