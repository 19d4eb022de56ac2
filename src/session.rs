//! Dashboard session: the result slot plus per-form loading and error state.
//!
//! A session owns everything that survives between requests. Each form (text
//! and batch) has its own pending flag; a submission while that flag is set is
//! refused, which is the only guard against overlapping calls.

use crate::api::{ToxicityApi, select_csv};
use crate::domain::HealthStatus;
use crate::error::AppError;
use crate::view::ResultView;

pub const EMPTY_TEXT: &str = "Veuillez saisir un texte.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Text,
    Batch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub loading: bool,
    pub error: Option<AppError>,
}

impl FormState {
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(AppError::message)
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result slot was replaced.
    Updated,
    /// Validation or the API failed; the message is on the form.
    Failed,
    /// The form was already waiting on a response.
    Busy,
}

#[derive(Debug, Default)]
pub struct Session {
    pub health: Option<HealthStatus>,
    pub view: ResultView,
    pub text_form: FormState,
    pub batch_form: FormState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_ready(&self) -> bool {
        self.health.as_ref().is_some_and(HealthStatus::is_ready)
    }

    pub fn refresh_health(&mut self, api: &impl ToxicityApi) {
        self.health = Some(api.health());
    }

    pub fn form(&self, form: Form) -> &FormState {
        match form {
            Form::Text => &self.text_form,
            Form::Batch => &self.batch_form,
        }
    }

    fn form_mut(&mut self, form: Form) -> &mut FormState {
        match form {
            Form::Text => &mut self.text_form,
            Form::Batch => &mut self.batch_form,
        }
    }

    /// Start a submission on `form`.
    ///
    /// Returns the validated input and marks the form pending, or the outcome to
    /// report without calling the API (busy, or validation failed).
    pub fn begin<T>(&mut self, form: Form, validated: Result<T, AppError>) -> Result<T, Outcome> {
        let state = self.form_mut(form);
        if state.loading {
            return Err(Outcome::Busy);
        }
        state.error = None;
        match validated {
            Ok(value) => {
                state.loading = true;
                Ok(value)
            }
            Err(err) => {
                state.error = Some(err);
                Err(Outcome::Failed)
            }
        }
    }

    /// Apply a response. The pending flag is cleared whatever the result.
    pub fn finish(&mut self, form: Form, result: Result<ResultView, AppError>) -> Outcome {
        let outcome = match result {
            Ok(view) => {
                self.view = view;
                Outcome::Updated
            }
            Err(err) => {
                tracing::warn!(?form, error = %err, "submission failed");
                self.form_mut(form).error = Some(err);
                Outcome::Failed
            }
        };
        self.form_mut(form).loading = false;
        outcome
    }

    /// Classify one text. Blank input never reaches the API.
    pub fn submit_text(&mut self, api: &impl ToxicityApi, text: &str) -> Outcome {
        let text = match self.begin(Form::Text, validate_text(text)) {
            Ok(text) => text,
            Err(outcome) => return outcome,
        };
        let result = api.predict(text).map(ResultView::Single);
        self.finish(Form::Text, result)
    }

    /// Upload a CSV for batch classification. A missing selection never reaches the API.
    pub fn submit_batch(&mut self, api: &impl ToxicityApi, raw_path: Option<&str>) -> Outcome {
        let path = match self.begin(Form::Batch, select_csv(raw_path)) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };
        let result = api.predict_batch(&path).map(ResultView::Batch);
        self.finish(Form::Batch, result)
    }
}

/// The text is sent as typed; it only has to contain something besides whitespace.
pub fn validate_text(text: &str) -> Result<&str, AppError> {
    if text.trim().is_empty() {
        Err(AppError::usage(EMPTY_TEXT))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::Path;

    use super::*;
    use crate::domain::{BatchResult, LabelMap, PredictionResult};

    #[derive(Default)]
    struct FakeApi {
        fail_with: Option<String>,
        ready: bool,
        calls: Cell<usize>,
    }

    impl FakeApi {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn outcome<T>(&self, value: T) -> Result<T, AppError> {
            self.calls.set(self.calls.get() + 1);
            match &self.fail_with {
                Some(msg) => Err(AppError::api(msg.clone())),
                None => Ok(value),
            }
        }
    }

    impl ToxicityApi for FakeApi {
        fn health(&self) -> HealthStatus {
            if self.ready {
                HealthStatus {
                    status: "ok".to_string(),
                    model_loaded: true,
                    model_path: None,
                    labels: None,
                }
            } else {
                HealthStatus::unreachable()
            }
        }

        fn predict(&self, text: &str) -> Result<PredictionResult, AppError> {
            self.outcome(PredictionResult {
                text: text.to_string(),
                probabilities: LabelMap::from_fn(|_| 0.5),
                predictions: LabelMap::default(),
            })
        }

        fn predict_batch(&self, _csv_path: &Path) -> Result<BatchResult, AppError> {
            self.outcome(BatchResult {
                n_rows: 0,
                results: Vec::new(),
            })
        }
    }

    fn csv_file() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comments.csv");
        std::fs::write(&path, "text\nhello\n").unwrap();
        let raw = path.to_string_lossy().to_string();
        (dir, raw)
    }

    #[test]
    fn blank_text_never_reaches_the_api() {
        let api = FakeApi::default();
        let mut session = Session::new();

        assert_eq!(session.submit_text(&api, "   \n"), Outcome::Failed);
        assert_eq!(api.calls.get(), 0);
        assert_eq!(session.text_form.error_message(), Some(EMPTY_TEXT));
        assert!(!session.text_form.loading);
        assert_eq!(session.view, ResultView::Empty);
    }

    #[test]
    fn missing_file_never_reaches_the_api() {
        let api = FakeApi::default();
        let mut session = Session::new();

        assert_eq!(session.submit_batch(&api, None), Outcome::Failed);
        assert_eq!(api.calls.get(), 0);
        assert_eq!(
            session.batch_form.error_message(),
            Some(crate::api::NO_FILE_SELECTED)
        );
    }

    #[test]
    fn single_and_batch_replace_each_other() {
        let api = FakeApi::default();
        let (_dir, raw) = csv_file();
        let mut session = Session::new();

        assert_eq!(session.submit_text(&api, "hello"), Outcome::Updated);
        assert!(matches!(session.view, ResultView::Single(ref r) if r.text == "hello"));

        assert_eq!(session.submit_batch(&api, Some(&raw)), Outcome::Updated);
        assert!(matches!(session.view, ResultView::Batch(_)));

        assert_eq!(session.submit_text(&api, "again"), Outcome::Updated);
        assert!(matches!(session.view, ResultView::Single(ref r) if r.text == "again"));
        assert_eq!(api.calls.get(), 3);
    }

    #[test]
    fn failure_keeps_previous_result_and_clears_loading() {
        let mut session = Session::new();
        session.submit_text(&FakeApi::default(), "first");

        let failing = FakeApi::failing("Model not loaded. Check MODEL_PATH.");
        assert_eq!(session.submit_text(&failing, "second"), Outcome::Failed);

        assert!(matches!(session.view, ResultView::Single(ref r) if r.text == "first"));
        assert_eq!(
            session.text_form.error_message(),
            Some("Model not loaded. Check MODEL_PATH.")
        );
        assert!(!session.text_form.loading);
    }

    #[test]
    fn next_success_clears_previous_error() {
        let mut session = Session::new();
        session.submit_text(&FakeApi::failing("boom"), "x");
        assert!(session.text_form.error.is_some());

        session.submit_text(&FakeApi::default(), "x");
        assert_eq!(session.text_form.error, None);
    }

    #[test]
    fn pending_form_refuses_new_submissions() {
        let api = FakeApi::default();
        let mut session = Session::new();
        session.text_form.loading = true;

        assert_eq!(session.submit_text(&api, "hello"), Outcome::Busy);
        assert_eq!(api.calls.get(), 0);

        // The other form is independent.
        let (_dir, raw) = csv_file();
        assert_eq!(session.submit_batch(&api, Some(&raw)), Outcome::Updated);
    }

    #[test]
    fn health_maps_to_ready_flag() {
        let mut session = Session::new();
        assert!(!session.api_ready());

        session.refresh_health(&FakeApi::default());
        assert!(!session.api_ready());
        assert_eq!(session.health.as_ref().map(|h| h.status.as_str()), Some("error"));

        session.refresh_health(&FakeApi {
            ready: true,
            ..FakeApi::default()
        });
        assert!(session.api_ready());
    }
}
