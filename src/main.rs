//! Pagewise - a terminal document viewer with an in-document search panel.
//!
//! # Usage
//!
//! ```bash
//! pagewise report.txt
//! pagewise --zoom 1.2 --markup answer.html report.txt
//! pagewise --suggest-url http://localhost:8000/suggest --answer-url http://localhost:8000/search
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagewise::app::{App, Settings};
use pagewise::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use pagewise::document::DocumentHandle;
use pagewise::perf;
use pagewise::search::KeywordSet;
use pagewise::services::{
    AnswerService, HttpAnswerService, HttpSuggestionService, Services, StaticSuggestions,
    SuggestionService,
};
use pagewise::viewer::{DEFAULT_VISIBILITY_THRESHOLD, ZoomController};

/// A terminal document viewer with page tracking, zoom and search
///
/// Numeric flags take strings here; the merged value is read from the
/// config layers so an invalid number falls back to its default.
#[derive(Parser, Debug)]
#[command(name = "pagewise", version, about, long_about = None)]
struct Cli {
    /// Document to open (text, or pdftotext output)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Initial zoom factor, 0.5 to 2.0
    #[arg(long, value_name = "FACTOR")]
    zoom: Option<String>,

    /// Source lines per page when the text has no form feeds
    #[arg(long, value_name = "N")]
    lines_per_page: Option<String>,

    /// Share of a page that must be visible to make it current
    #[arg(long, value_name = "RATIO")]
    threshold: Option<String>,

    /// Keyword suggestion endpoint
    #[arg(long, value_name = "URL")]
    suggest_url: Option<String>,

    /// Question answering endpoint
    #[arg(long, value_name = "URL")]
    answer_url: Option<String>,

    /// Markup file to highlight matches in
    #[arg(long, value_name = "PATH")]
    markup: Option<PathBuf>,

    /// Keyword file, one keyword per line
    #[arg(long, value_name = "PATH")]
    keywords: Option<PathBuf>,

    /// Accepted upload extensions, comma separated
    #[arg(long, value_name = "EXTS")]
    accept: Option<String>,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed render/task debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Write tracing output to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("pagewise=debug")),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn build_services(flags: &ConfigFlags) -> Result<Services> {
    let suggestions: Option<Arc<dyn SuggestionService>> =
        match (&flags.suggest_url, &flags.keywords) {
            (Some(url), _) => Some(Arc::new(HttpSuggestionService::new(url.clone()))),
            (None, Some(path)) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read keywords {}", path.display()))?;
                Some(Arc::new(StaticSuggestions::new(
                    KeywordSet::from_keyword_file(&contents),
                )))
            }
            (None, None) => None,
        };
    let answers: Option<Arc<dyn AnswerService>> = flags
        .answer_url
        .as_ref()
        .map(|url| Arc::new(HttpAnswerService::new(url.clone())) as Arc<dyn AnswerService>);

    Ok(Services::local(flags.lines_per_page(), flags.accept())
        .with_suggestions(suggestions)
        .with_answers(answers))
}

fn build_settings(flags: &ConfigFlags) -> Result<Settings> {
    let local_markup = flags
        .markup
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read markup {}", path.display()))
        })
        .transpose()?;
    Ok(Settings {
        zoom: flags
            .zoom
            .map_or_else(ZoomController::default, ZoomController::from_factor),
        threshold: flags.threshold.unwrap_or(DEFAULT_VISIBILITY_THRESHOLD),
        local_markup,
        ..Settings::default()
    })
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "effective configuration");

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("PAGEWISE_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let services = build_services(&effective)?;
    let settings = build_settings(&effective)?;

    let mut app = App::new(services)
        .with_settings(settings)
        .with_document(cli.file.as_deref().map(DocumentHandle::from_path))
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
