//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring code stays clean and testable
//! - output changes are localized

use crate::domain::HealthStatus;
use crate::scoring::Tone;
use crate::view::{BATCH_DISPLAY_LIMIT, BatchView, LabelCard, Rendered, SingleView};

pub const EMPTY_STATE: &str = "Aucun résultat pour le moment.";
pub const DETECTED_HINT: &str = "⚠️ Label détecté.";
pub const NOT_DETECTED_HINT: &str = "✅ Non détecté (selon seuil interne du modèle).";

const BAR_WIDTH: usize = 20;
const TEXT_WIDTH: usize = 60;

/// `API: Model loaded` or `API: Not ready`.
pub fn health_pill(health: &HealthStatus) -> &'static str {
    if health.is_ready() {
        "API: Model loaded"
    } else {
        "API: Not ready"
    }
}

pub fn format_health(health: &HealthStatus) -> String {
    let mut out = String::new();
    out.push_str(health_pill(health));
    out.push('\n');
    out.push_str(&format!("status: {}\n", health.status));
    out.push_str(&format!("model_loaded: {}\n", health.model_loaded));
    if let Some(path) = &health.model_path {
        out.push_str(&format!("model_path: {path}\n"));
    }
    if let Some(labels) = &health.labels {
        out.push_str(&format!("labels: {}\n", labels.join(", ")));
    }
    out
}

pub fn format_rendered(rendered: &Rendered) -> String {
    match rendered {
        Rendered::Empty => format!("{EMPTY_STATE}\n"),
        Rendered::Single(view) => format_single(view),
        Rendered::Batch(view) => format_batch(view),
    }
}

/// Format the single-text analysis: score, tier, guidance, top labels, full breakdown.
pub fn format_single(view: &SingleView) -> String {
    let mut out = String::new();

    out.push_str("=== Analyse du texte ===\n");
    out.push_str(&format!("Texte: {}\n\n", view.text));

    out.push_str(&format!(
        "Score global: {}   Risque : {} [{}]\n",
        view.global_pct,
        view.tier_label,
        tone_tag(view.tone)
    ));
    out.push_str(&format!("{}\n", bar(view.global_score, BAR_WIDTH)));

    out.push_str("\nRecommandations:\n");
    for line in &view.recommendations {
        out.push_str(&format!("- {line}\n"));
    }

    out.push_str(&format!(
        "\nTop {} labels les plus probables (priorité modération):\n",
        view.top.len()
    ));
    for card in &view.top {
        out.push_str(&format!(
            "  {:<14} {}  proba: {}  {}  {}\n",
            card.name,
            card.prediction,
            card.probability_text(),
            bar(card.probability, BAR_WIDTH / 2),
            if card.is_detected() { DETECTED_HINT } else { NOT_DETECTED_HINT },
        ));
    }

    out.push_str("\nDétails complets (6 labels):\n");
    out.push_str(&format_breakdown(&view.breakdown));

    out
}

fn format_breakdown(cards: &[LabelCard]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<14} {:>4} {:>8}  {:<width$} {:<4}", "label", "pred", "proba", "", "tone", width = BAR_WIDTH).trim_end());
    out.push('\n');
    out.push_str(format!("{:-<14} {:-<4} {:-<8}  {:-<width$} {:-<4}", "", "", "", "", "", width = BAR_WIDTH).trim_end());
    out.push('\n');

    for card in cards {
        out.push_str(
            format!(
                "{:<14} {:>4} {:>8}  {} {}",
                card.name,
                card.prediction,
                card.probability_text(),
                bar(card.probability, BAR_WIDTH),
                tone_tag(card.tone),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the batch view: row count, first rows with their 0/1 flags.
pub fn format_batch(view: &BatchView) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Résultats Batch ({} lignes) ===\n", view.n_rows));
    for row in &view.rows {
        out.push_str(&format!("{}\n", truncate(&single_line(&row.text), TEXT_WIDTH)));
        let flags: Vec<String> = row
            .flags
            .iter()
            .map(|f| format!("{}:{}", f.name, f.prediction))
            .collect();
        out.push_str(&format!("  {}\n", flags.join("  ")));
    }

    if view.truncated {
        out.push_str(&format!(
            "\nAffichage limité aux {BATCH_DISPLAY_LIMIT} premières lignes.\n"
        ));
    }

    out
}

pub fn tone_tag(tone: Tone) -> &'static str {
    match tone {
        Tone::Ok => "ok",
        Tone::Warn => "warn",
        Tone::Bad => "bad",
        Tone::Bad2 => "bad2",
    }
}

/// Fixed-width progress bar for a value in `[0, 1]`.
pub fn bar(value: f64, width: usize) -> String {
    let filled = ((crate::scoring::clamp01(value) * width as f64).round() as usize).min(width);
    let mut out = String::with_capacity(width * 3);
    out.push_str(&"█".repeat(filled));
    out.push_str(&"░".repeat(width - filled));
    out
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
