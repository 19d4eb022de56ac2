//! Input/output helpers.
//!
//! - batch result export (CSV) (`export`)

pub mod export;

pub use export::*;
