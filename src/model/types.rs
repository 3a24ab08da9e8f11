//! Upstream entity records consumed by the palette.
//!
//! These mirror what the data layer hands over: a flat project list and a
//! sidebar tree of projects → tasks → sessions. Statuses stay open strings;
//! only a couple of values carry meaning here.

use serde::{Deserialize, Serialize};

/// Task status that flags work waiting on a human review.
pub const STATUS_IN_REVIEW: &str = "in_review";

/// Session status that flags an agent blocked on user input.
pub const STATUS_WAITING_FOR_INPUT: &str = "waiting_for_input";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: String,
}

/// One project node of the sidebar tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<SidebarTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarTask {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub sessions: Vec<SidebarSession>,
}

/// An agent session attached to a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarSession {
    pub id: String,
    /// Display name of the agent provider (e.g. "Claude", "Codex").
    pub provider: String,
    /// Per-task session counter, shown as `#n`.
    pub number: u32,
    pub status: String,
}

/// Render a raw status (`in_review`) for display (`in review`).
pub fn humanize_status(status: &str) -> String {
    status.replace('_', " ")
}
