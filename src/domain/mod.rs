//! Domain types shared by the client, the scoring functions and the views.
//!
//! This module defines:
//!
//! - the closed label set (`Label`) and per-label storage (`LabelMap`)
//! - API payloads (`PredictionResult`, `BatchResult`, `HealthStatus`)

pub mod label;
pub mod types;

pub use label::*;
pub use types::*;
