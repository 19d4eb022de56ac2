//! Client side of the toxicity-classification API.
//!
//! - the `ToxicityApi` seam the session talks to (`client`)
//! - CSV upload path checks (`upload`)

pub mod client;
pub mod upload;

pub use client::*;
pub use upload::*;
