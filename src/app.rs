//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - calls the API through a `Session`
//! - prints reports or runs the dashboard

use clap::Parser;

use crate::api::{ApiClient, ToxicityApi};
use crate::cli::{BatchArgs, Cli, Command, GlobalArgs, PredictArgs, TuiArgs, rewrite_args};
use crate::config::{Settings, load_dotenv};
use crate::error::AppError;
use crate::report::{format_health, format_rendered};
use crate::session::{Form, Outcome, Session};
use crate::view::{ResultView, render};

/// Entry point for the `toxiscan` binary.
pub fn run() -> Result<(), AppError> {
    load_dotenv();
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    if !matches!(cli.command, Command::Tui(_)) {
        crate::logging::init_stderr(cli.global.verbose);
    }

    let settings = Settings::resolve(cli.global.api_url.as_deref(), cli.global.top)?;
    tracing::debug!(api_url = %settings.api_url, "settings resolved");

    match cli.command {
        Command::Health => handle_health(settings),
        Command::Predict(args) => handle_predict(settings, args),
        Command::Batch(args) => handle_batch(settings, args),
        Command::Tui(args) => handle_tui(settings, args, &cli.global),
    }
}

fn handle_health(settings: Settings) -> Result<(), AppError> {
    let client = ApiClient::new(settings)?;
    let health = client.health();
    print!("{}", format_health(&health));
    if health.is_ready() {
        Ok(())
    } else {
        Err(AppError::api(format!(
            "API at {} is not ready.",
            client.base_url()
        )))
    }
}

fn handle_predict(settings: Settings, args: PredictArgs) -> Result<(), AppError> {
    let top = settings.top_k;
    let client = ApiClient::new(settings)?;
    let mut session = Session::new();

    let outcome = session.submit_text(&client, &args.text);
    print_outcome(&session, Form::Text, outcome, top, args.json)
}

fn handle_batch(settings: Settings, args: BatchArgs) -> Result<(), AppError> {
    let top = settings.top_k;
    let client = ApiClient::new(settings)?;
    let mut session = Session::new();

    let raw = args.file.to_string_lossy();
    let outcome = session.submit_batch(&client, Some(&raw));
    print_outcome(&session, Form::Batch, outcome, top, args.json)?;

    if let (Some(path), ResultView::Batch(batch)) = (&args.export, &session.view) {
        crate::io::write_batch_csv(path, batch)?;
        eprintln!("Exported {} rows to {}", batch.results.len(), path.display());
    }
    Ok(())
}

fn print_outcome(
    session: &Session,
    form: Form,
    outcome: Outcome,
    top: usize,
    json: bool,
) -> Result<(), AppError> {
    if outcome != Outcome::Updated {
        return Err(session
            .form(form)
            .error
            .clone()
            .unwrap_or_else(|| AppError::usage("A request is already pending.")));
    }

    let rendered = render(&session.view, top);
    if json {
        let out = serde_json::to_string_pretty(&rendered)
            .map_err(|e| AppError::usage(format!("Failed to encode JSON: {e}")))?;
        println!("{out}");
    } else {
        print!("{}", format_rendered(&rendered));
    }
    Ok(())
}

fn handle_tui(settings: Settings, args: TuiArgs, global: &GlobalArgs) -> Result<(), AppError> {
    if let Some(path) = &args.log_file {
        crate::logging::init_file(path, global.verbose)?;
    }
    crate::tui::run(settings)
}
