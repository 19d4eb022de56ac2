//! Export batch results to CSV.
//!
//! Every row is written (not just the ones shown on screen), with the derived
//! global score and risk tier alongside the raw labels, so the file is easy to
//! consume in spreadsheets or downstream scripts.

use std::io::Write;
use std::path::Path;

use crate::domain::{BatchResult, Label};
use crate::error::AppError;
use crate::scoring::{clamp01, compute_global_score, risk_level};

/// Write all batch rows to a CSV file.
pub fn write_batch_csv(path: &Path, batch: &BatchResult) -> Result<(), AppError> {
    let file = std::fs::File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;
    write_batch(file, batch)?;
    tracing::info!(path = %path.display(), rows = batch.results.len(), "batch exported");
    Ok(())
}

/// Write all batch rows as CSV to any writer.
pub fn write_batch<W: Write>(writer: W, batch: &BatchResult) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = vec!["row".to_string(), "text".to_string()];
    header.extend(Label::ALL.iter().map(|l| format!("{}_proba", l.id())));
    header.extend(Label::ALL.iter().map(|l| format!("{}_pred", l.id())));
    header.push("global_score".to_string());
    header.push("risk".to_string());
    wtr.write_record(&header)
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for (idx, row) in batch.results.iter().enumerate() {
        let score = compute_global_score(&row.probabilities);

        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(idx.to_string());
        record.push(row.text.clone());
        record.extend(
            row.probabilities
                .values()
                .map(|&p| format!("{:.4}", clamp01(p))),
        );
        record.extend(row.predictions.values().map(u8::to_string));
        record.push(format!("{score:.4}"));
        record.push(risk_level(score).label().to_string());

        wtr.write_record(&record)
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row {idx}: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::usage(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LabelMap, PredictionResult};

    fn batch() -> BatchResult {
        BatchResult {
            n_rows: 2,
            results: vec![
                PredictionResult {
                    text: "hello, world".to_string(),
                    probabilities: LabelMap::default(),
                    predictions: LabelMap::default(),
                },
                PredictionResult {
                    text: "die".to_string(),
                    probabilities: LabelMap::from_fn(|l| if l == Label::Threat { f64::NAN } else { 0.75 }),
                    predictions: LabelMap::from_fn(|l| u8::from(l != Label::Threat)),
                },
            ],
        }
    }

    #[test]
    fn writes_header_and_all_rows() {
        let mut buf = Vec::new();
        write_batch(&mut buf, &batch()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("row,text,toxic_proba,severe_toxic_proba"));
        assert!(lines[0].ends_with("identity_hate_pred,global_score,risk"));
        assert_eq!(
            lines[1],
            "0,\"hello, world\",0.0000,0.0000,0.0000,0.0000,0.0000,0.0000,0,0,0,0,0,0,0.0000,Faible"
        );
        assert_eq!(
            lines[2],
            "1,die,0.7500,0.7500,0.7500,0.0000,0.7500,0.7500,1,1,1,0,1,1,0.6250,Élevé"
        );
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_batch_csv(&path, &batch()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }

    #[test]
    fn unwritable_path_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_batch_csv(&dir.path().join("missing/out.csv"), &batch()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
