//! `toxiscan` library crate.
//!
//! The binary (`toxiscan`) is a thin wrapper around this library so that:
//!
//! - scoring and view logic is testable without a running API
//! - the CLI and the dashboard share one session model

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod scoring;
pub mod session;
pub mod tui;
pub mod view;
