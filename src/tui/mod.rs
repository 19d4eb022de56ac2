//! Ratatui-based terminal dashboard.
//!
//! Left panel: a text form and a CSV form. Right panel: the latest result.
//! Calls are blocking; the pending form shows `Loading...` for the duration
//! and ignores further submits.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::api::{ApiClient, ToxicityApi, discover_csv_files, pretty_path, select_csv};
use crate::config::Settings;
use crate::error::AppError;
use crate::report::health_pill;
use crate::session::{Form, Outcome, Session, validate_text};
use crate::view::{ResultView, render};

mod results;

/// Start the TUI.
pub fn run(settings: Settings) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::usage(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(settings)?;
    terminal
        .draw(|f| app.draw(f))
        .map_err(|e| AppError::usage(format!("Terminal draw error: {e}")))?;
    app.session.refresh_health(&app.client);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::usage(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::usage(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    top_k: usize,
    client: ApiClient,
    session: Session,
    focus: Form,
    text_input: String,
    path_input: String,
    csv_choices: Vec<PathBuf>,
    csv_index: Option<usize>,
    scroll: u16,
    last_update: Option<DateTime<Local>>,
}

impl App {
    fn new(settings: Settings) -> Result<Self, AppError> {
        Ok(Self {
            top_k: settings.top_k,
            client: ApiClient::new(settings)?,
            session: Session::new(),
            focus: Form::Text,
            text_input: String::new(),
            path_input: String::new(),
            csv_choices: discover_csv_files(),
            csv_index: None,
            scroll: 0,
            last_update: None,
        })
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::usage(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::usage(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key, terminal)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn redraw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::usage(format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<bool, AppError> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Char('c') if ctrl => return Ok(true),
            KeyCode::Char('u') if ctrl => self.input_mut().clear(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Form::Text => Form::Batch,
                    Form::Batch => Form::Text,
                };
            }
            KeyCode::Enter => self.submit(terminal)?,
            KeyCode::Backspace => {
                self.input_mut().pop();
            }
            KeyCode::Up if self.focus == Form::Batch => self.cycle_csv(-1),
            KeyCode::Down if self.focus == Form::Batch => self.cycle_csv(1),
            KeyCode::Up | KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::PageDown => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char(c) if !ctrl => self.input_mut().push(c),
            _ => {}
        }
        Ok(false)
    }

    fn input_mut(&mut self) -> &mut String {
        match self.focus {
            Form::Text => &mut self.text_input,
            Form::Batch => &mut self.path_input,
        }
    }

    fn cycle_csv(&mut self, delta: isize) {
        if self.csv_choices.is_empty() {
            return;
        }
        let n = self.csv_choices.len() as isize;
        let next = match self.csv_index {
            None if delta >= 0 => 0,
            None => n - 1,
            Some(i) => (i as isize + delta).rem_euclid(n),
        };
        self.csv_index = Some(next as usize);
        self.path_input = pretty_path(&self.csv_choices[next as usize]);
    }

    /// Validate, show the pending state, call the API, then apply the response.
    fn submit<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let outcome = match self.focus {
            Form::Text => {
                let input = self.text_input.clone();
                let Ok(text) = self.session.begin(Form::Text, validate_text(&input)) else {
                    return Ok(());
                };
                self.redraw(terminal)?;
                let result = self.client.predict(text).map(ResultView::Single);
                self.session.finish(Form::Text, result)
            }
            Form::Batch => {
                let validated = select_csv(Some(self.path_input.as_str()));
                let Ok(path) = self.session.begin(Form::Batch, validated) else {
                    return Ok(());
                };
                self.redraw(terminal)?;
                let result = self.client.predict_batch(&path).map(ResultView::Batch);
                self.session.finish(Form::Batch, result)
            }
        };
        if outcome == Outcome::Updated {
            self.scroll = 0;
            self.last_update = Some(Local::now());
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        self.draw_forms(frame, body[0]);
        self.draw_results(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (pill, color) = match &self.session.health {
            None => ("API: checking...", Color::Gray),
            Some(h) if h.is_ready() => (health_pill(h), Color::Green),
            Some(h) => (health_pill(h), Color::Red),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    "ToxiScan",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
                Span::styled(format!(" {pill} "), Style::default().fg(Color::Black).bg(color)),
            ]),
            Line::from(Span::styled(
                format!(
                    "Détection multi-label de toxicité (6 labels) | {}",
                    self.client.base_url()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_forms(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(6), Constraint::Length(6)])
            .split(area);

        self.draw_form(
            frame,
            chunks[0],
            Form::Text,
            "Prédiction (texte unique)",
            &self.text_input,
            "Ex: You are stupid and I hate you",
        );
        self.draw_form(
            frame,
            chunks[1],
            Form::Batch,
            "Batch prediction (CSV)",
            &self.path_input,
            "chemin/vers/fichier.csv (↑/↓ pour parcourir)",
        );

        let help = vec![
            Line::from("Teste un texte (Enter sur le premier formulaire)."),
            Line::from("Ou un CSV (colonne text ou comment_text)."),
            Line::from(format!(
                "Les résultats s’affichent à droite (Top {} + détails).",
                self.top_k
            )),
        ];
        let p = Paragraph::new(help)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Comment utiliser").borders(Borders::ALL));
        frame.render_widget(p, chunks[2]);
    }

    fn draw_form(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        form: Form,
        title: &str,
        input: &str,
        placeholder: &str,
    ) {
        let focused = self.focus == form;
        let state = self.session.form(form);

        let mut lines = Vec::new();
        if input.is_empty() {
            lines.push(Line::from(Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        } else if focused {
            lines.push(Line::from(format!("{input}▏")));
        } else {
            lines.push(Line::from(input.to_string()));
        }

        if state.loading {
            lines.push(Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(message) = state.error_message() {
            lines.push(Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            )));
        }

        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(p, area);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rendered = render(&self.session.view, self.top_k);
        let p = Paragraph::new(results::result_lines(&rendered))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(Block::default().title("Résultats").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab switch form  Enter submit  ↑/↓ scroll (CSV: browse)  Ctrl-U clear  Esc quit";
        let status = if self.session.text_form.loading || self.session.batch_form.loading {
            "Loading...".to_string()
        } else if let Some(at) = self.last_update {
            format!("Mis à jour à {}", at.format("%H:%M:%S"))
        } else {
            String::new()
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
