//! Results panel content: turns a rendered view into styled lines.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::report::{DETECTED_HINT, EMPTY_STATE, NOT_DETECTED_HINT, bar};
use crate::scoring::Tone;
use crate::view::{BATCH_DISPLAY_LIMIT, BatchView, LabelCard, Rendered, SingleView};

const BAR_WIDTH: usize = 24;
const MINI_BAR_WIDTH: usize = 12;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Ok => Color::Green,
        Tone::Warn => Color::Yellow,
        Tone::Bad => Color::Red,
        Tone::Bad2 => Color::Magenta,
    }
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn subtle(text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(Color::Gray))
}

fn badge(prediction: u8) -> Span<'static> {
    let color = if prediction == 1 { Color::Red } else { Color::Green };
    Span::styled(
        format!(" {prediction} "),
        Style::default().fg(Color::Black).bg(color),
    )
}

pub fn result_lines(rendered: &Rendered) -> Vec<Line<'static>> {
    match rendered {
        Rendered::Empty => vec![Line::from(subtle(EMPTY_STATE))],
        Rendered::Single(view) => single_lines(view),
        Rendered::Batch(view) => batch_lines(view),
    }
}

fn single_lines(view: &SingleView) -> Vec<Line<'static>> {
    let tone = Style::default().fg(tone_color(view.tone));
    let mut lines = vec![
        heading("Analyse du texte"),
        Line::from(vec![subtle("Texte  "), Span::raw(view.text.clone())]),
        Line::default(),
        Line::from(vec![
            subtle("Score global  "),
            Span::styled(view.global_pct.clone(), tone.add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled(format!("Risque : {}", view.tier_label), tone),
        ]),
        Line::from(Span::styled(bar(view.global_score, BAR_WIDTH), tone)),
        Line::default(),
        heading("Recommandations"),
    ];
    lines.extend(
        view.recommendations
            .iter()
            .map(|r| Line::from(format!("• {r}"))),
    );

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(
            format!("Top {} labels les plus probables ", view.top.len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        subtle("(priorité modération)"),
    ]));
    for card in &view.top {
        lines.push(card_line(card, MINI_BAR_WIDTH));
        let hint = if card.is_detected() { DETECTED_HINT } else { NOT_DETECTED_HINT };
        lines.push(Line::from(subtle(format!("    {hint}"))));
    }

    lines.push(Line::default());
    lines.push(heading("Détails complets (6 labels)"));
    lines.extend(view.breakdown.iter().map(|c| card_line(c, BAR_WIDTH)));
    lines
}

fn card_line(card: &LabelCard, width: usize) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<14}", card.name)),
        badge(card.prediction),
        Span::raw(format!("  {}  ", card.probability_text())),
        Span::styled(
            bar(card.probability, width),
            Style::default().fg(tone_color(card.tone)),
        ),
    ])
}

fn batch_lines(view: &BatchView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            "Résultats Batch ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        subtle(format!("({} lignes)", view.n_rows)),
    ])];

    for row in &view.rows {
        lines.push(Line::default());
        lines.push(Line::from(Span::raw(row.text.clone())));
        let mut badges = Vec::with_capacity(row.flags.len() * 2);
        for flag in &row.flags {
            badges.push(subtle(format!("{}:", flag.name)));
            badges.push(badge(flag.prediction));
            badges.push(Span::raw(" "));
        }
        lines.push(Line::from(badges));
    }

    if view.truncated {
        lines.push(Line::default());
        lines.push(Line::from(subtle(format!(
            "Affichage limité aux {BATCH_DISPLAY_LIMIT} premières lignes."
        ))));
    }
    lines
}
