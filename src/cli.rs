//! Command-line harness around the palette engine.
//!
//! `items` prints the flat index, `replay` drives a mounted shell with a key
//! script and reports what it navigated to, `interactive` runs the terminal
//! host.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PaletteConfig;
use crate::model::snapshot::WorkspaceSnapshot;
use crate::ui::components::command_index::{
    CommandItem, Destination, PaletteSources, filter_items,
};
use crate::ui::keys::parse_key_script;
use crate::ui::shell::{RecordingNavigator, Shell, ShellEvent};
use crate::ui::terminal;

#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "Keyboard-first command palette over projects, tasks and agent sessions"
)]
pub struct Cli {
    /// Palette config file (defaults to the XDG config location)
    #[arg(long, global = true, env = "TASKDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the flat command index, optionally filtered by a query
    Items {
        /// Workspace snapshot (JSON)
        #[arg(long)]
        workspace: PathBuf,
        /// Substring filter over label and detail
        #[arg(long, default_value = "")]
        query: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay a key script against a mounted palette and report navigation
    Replay {
        /// Workspace snapshot (JSON)
        #[arg(long)]
        workspace: PathBuf,
        /// Comma-separated keys, e.g. "ctrl+k,text:review,down,enter"
        #[arg(long)]
        keys: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the palette in this terminal (Ctrl+C quits)
    Interactive {
        /// Workspace snapshot (JSON)
        #[arg(long)]
        workspace: PathBuf,
    },
}

impl Commands {
    pub fn wants_json(&self) -> bool {
        match self {
            Commands::Items { json, .. } | Commands::Replay { json, .. } => *json,
            Commands::Interactive { .. } => false,
        }
    }
}

/// Failure surfaced to the user, with an exit code.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub code: i32,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(err: clap::Error) -> Self {
        Self {
            code: err.exit_code(),
            kind: "usage",
            message: err.render().to_string(),
            hint: None,
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        let hint = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<crate::ui::keys::KeySpecError>())
            .map(|_| {
                "keys are comma-separated: ctrl+k, down, up, enter, esc, backspace, text:<chars>"
                    .to_string()
            });
        Self {
            code: 1,
            kind: "runtime",
            message: format!("{err:#}"),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\nhint: {hint}")?;
        }
        Ok(())
    }
}

pub fn parse_cli<I, T>(args: I) -> Result<Cli, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(CliError::usage)
}

fn load_config(path: Option<&Path>) -> Result<PaletteConfig> {
    let config = match path {
        Some(path) => PaletteConfig::load_from(path),
        None => PaletteConfig::load(),
    };
    config.context("loading palette config")
}

fn load_sources(workspace: &Path) -> Result<PaletteSources> {
    let snapshot = WorkspaceSnapshot::load_from(workspace)
        .with_context(|| format!("loading workspace {}", workspace.display()))?;
    let (projects, sidebar) = snapshot.into_shared();
    Ok(PaletteSources::new(projects, sidebar))
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    crate::logging::init(cli.verbose);
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "config loaded");

    match cli.command {
        Commands::Items {
            workspace,
            query,
            json,
        } => {
            let sources = load_sources(&workspace)?;
            let items = sources.build();
            let filtered = filter_items(&items, &query);
            print_items(&filtered, json)?;
        }
        Commands::Replay {
            workspace,
            keys,
            json,
        } => {
            let sources = load_sources(&workspace)?;
            let report = replay(sources, &keys, config)?;
            print_report(&report, json)?;
        }
        Commands::Interactive { workspace } => {
            let sources = load_sources(&workspace)?;
            let mut shell = mount_with(sources, config)?;
            terminal::run_interactive(&mut shell)?;
        }
    }
    Ok(())
}

fn mount_with(sources: PaletteSources, config: PaletteConfig) -> Result<Shell<RecordingNavigator>> {
    let mut shell = Shell::mount(RecordingNavigator::new(), config)?;
    shell.set_actions(Arc::clone(&sources.actions));
    shell.set_projects(sources.projects);
    shell.set_sidebar(sources.sidebar);
    Ok(shell)
}

fn print_items(items: &[CommandItem], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    for item in items {
        match &item.detail {
            Some(detail) => println!("{} {}  {}  {}", item.icon, item.id, item.label, detail),
            None => println!("{} {}  {}", item.icon, item.id, item.label),
        }
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Replay
// -------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub key: String,
    pub handled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ShellEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    pub matches: usize,
    pub navigations: Vec<Destination>,
    pub steps: Vec<ReplayStep>,
}

/// Mount a shell over `sources`, feed it `keys`, and describe the outcome.
pub fn replay(sources: PaletteSources, keys: &str, config: PaletteConfig) -> Result<ReplayReport> {
    let events = parse_key_script(keys).context("parsing key script")?;
    let mut shell = mount_with(sources, config)?;

    let mut steps = Vec::with_capacity(events.len());
    for key in &events {
        let outcome = shell.handle_key(key);
        steps.push(ReplayStep {
            key: key.to_string(),
            handled: outcome.handled,
            events: outcome.events,
        });
    }

    let palette = shell.palette();
    Ok(ReplayReport {
        open: shell.is_open(),
        query: palette.map(|p| p.query().to_string()),
        selected: palette.and_then(|p| p.selected()),
        selected_id: palette
            .and_then(|p| p.selected_item())
            .map(|item| item.id.clone()),
        matches: palette.map_or(0, |p| p.filtered().len()),
        navigations: shell.navigator().destinations().to_vec(),
        steps,
    })
}

fn print_report(report: &ReplayReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for destination in &report.navigations {
        println!("navigate {destination}");
    }
    if report.open {
        let query = report.query.as_deref().unwrap_or_default();
        let selected = report.selected_id.as_deref().unwrap_or("none");
        println!(
            "palette open: query {query:?}, {} matches, selected {selected}",
            report.matches
        );
    } else {
        println!("palette closed");
    }
    Ok(())
}
