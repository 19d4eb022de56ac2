//! Plain-text reports for the one-shot subcommands.

pub mod format;

pub use format::*;
