//! Inspection entry point.
//!
//! # Responsibility
//! - Open a journal database and print one rendered view as JSON.
//! - Keep output deterministic for quick local checks.

use clap::{Parser, ValueEnum};
use habitview_core::{
    init_logging, AppConfig, EntryForm, IndicatorStrip, JournalQueries, RenderContext, ScopeMode,
    SqliteDocumentStore, SummaryTable, View, ViewHost,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

/// Render one habit view from a journal database.
#[derive(Debug, Parser)]
#[command(name = "habitview_cli", version = habitview_core::core_version())]
struct Cli {
    /// Path to the SQLite journal database.
    db_path: PathBuf,
    /// Which view to render.
    #[arg(value_enum)]
    view: ViewKind,
    /// Title of the current subject document.
    subject: String,
    /// Optional story title; takes precedence over the subject as scope.
    story: Option<String>,
    /// JSON config file with schema and logging settings.
    #[arg(long, env = "HABITVIEW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewKind {
    Strip,
    Form,
    Week,
    Year,
}

impl ViewKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Strip => "strip",
            Self::Form => "form",
            Self::Week => "week",
            Self::Year => "year",
        }
    }

    fn create(self) -> Box<dyn View> {
        match self {
            Self::Strip => Box::new(IndicatorStrip::new()),
            Self::Form => Box::new(EntryForm::new()),
            Self::Week => Box::new(SummaryTable::new(ScopeMode::Daily)),
            Self::Year => Box::new(SummaryTable::new(ScopeMode::Yearly)),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let config = load_config(cli.config.as_ref())?;
    if let Some(log) = config.log.as_ref() {
        init_logging(log)?;
    }

    let mut context = RenderContext::for_subject(cli.subject.as_str());
    if let Some(story) = cli.story.as_deref() {
        context = context.with_story(story);
    }

    let store = SqliteDocumentStore::open(&cli.db_path).map_err(|err| err.to_string())?;
    let mut host = ViewHost::new(JournalQueries::new(config.schema), context);
    let id = host.add(cli.view.create());
    host.render(&store);
    info!(
        "event=cli_render module=cli status=ok view={} nodes={}",
        cli.view.as_str(),
        host.tree(id).len()
    );

    serde_json::to_string_pretty(host.tree(id)).map_err(|err| err.to_string())
}

/// Reads the config file, or falls back to defaults when none is given.
fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("cannot read config `{}`: {err}", path.display()))?,
        None => "{}".to_string(),
    };
    AppConfig::from_json_str(&text).map_err(|err| err.to_string())
}
