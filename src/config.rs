//! Runtime settings resolved from CLI flags, the environment and `.env`.

use crate::error::AppError;
use crate::scoring::DEFAULT_TOP_K;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const API_URL_ENV: &str = "TOXISCAN_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the classification API, without a trailing slash.
    pub api_url: String,
    /// How many labels the single-result view highlights.
    pub top_k: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Settings {
    /// Build settings from an optional URL (flag or env, already merged by clap).
    pub fn resolve(api_url: Option<&str>, top_k: usize) -> Result<Self, AppError> {
        let api_url = match api_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => normalize_url(url)?,
            None => DEFAULT_API_URL.to_string(),
        };
        if top_k == 0 {
            return Err(AppError::usage("--top must be at least 1."));
        }
        Ok(Self { api_url, top_k })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

/// Load `.env` into the process environment if one exists.
///
/// Must run before clap parses arguments so `env = ...` fallbacks see it.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn normalize_url(raw: &str) -> Result<String, AppError> {
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(AppError::usage(format!(
            "Invalid API URL '{raw}': expected http:// or https://."
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_api() {
        let settings = Settings::resolve(None, DEFAULT_TOP_K).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.top_k, 3);

        let blank = Settings::resolve(Some("  "), DEFAULT_TOP_K).unwrap();
        assert_eq!(blank.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn strips_trailing_slashes() {
        let settings = Settings::resolve(Some("https://api.example.org/v1//"), 6).unwrap();
        assert_eq!(settings.api_url, "https://api.example.org/v1");
        assert_eq!(
            settings.endpoint("/predict"),
            "https://api.example.org/v1/predict"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = Settings::resolve(Some("localhost:8000"), DEFAULT_TOP_K).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn rejects_zero_top_k() {
        assert!(Settings::resolve(None, 0).is_err());
    }
}
