//! CSV upload selection.
//!
//! Checks a user-supplied path before anything is sent, and lists candidate
//! `*.csv` files so the TUI can offer them without typing a path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const NO_FILE_SELECTED: &str = "Veuillez choisir un fichier CSV.";

const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Resolve the raw path field of the batch form into an uploadable file.
pub fn select_csv(raw: Option<&str>) -> Result<PathBuf, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(AppError::usage(NO_FILE_SELECTED));
    };
    validate_csv_path(Path::new(raw))
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::usage(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::usage(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::usage(format!(
            "Expected a .csv file (got: {}).",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

/// `*.csv` files under the current directory, in a stable order.
pub fn discover_csv_files() -> Vec<PathBuf> {
    find_csv_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files_inner(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_csv_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files_inner(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

pub fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
