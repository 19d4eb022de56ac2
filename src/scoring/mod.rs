//! Scoring: pure functions that turn per-label probabilities into a risk summary.
//!
//! - numeric normalization and formatting (`scalar`)
//! - the global score (`aggregate`)
//! - risk tiers (`risk`)
//! - label ranking (`rank`)
//! - moderation guidance (`advice`)

pub mod advice;
pub mod aggregate;
pub mod rank;
pub mod risk;
pub mod scalar;

pub use advice::*;
pub use aggregate::*;
pub use rank::*;
pub use risk::*;
pub use scalar::*;
