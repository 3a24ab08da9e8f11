//! taskdeck: the in-app command palette engine.
//!
//! Upstream collections (static actions, the project list and the sidebar
//! tree) are flattened into one ordered index, filtered by substring,
//! navigated with the keyboard and activated through a [`ui::shell::Navigator`].
//! The global Ctrl/Cmd+K toggle decides whether any of that runs at all.

pub mod cli;
pub mod config;
pub mod logging;
pub mod model;
pub mod ui;

pub use cli::{Cli, CliError, Commands, parse_cli, run};
