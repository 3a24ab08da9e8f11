//! Workspace snapshot files.
//!
//! A snapshot is the JSON form of what the data layer has fetched so far.
//! A missing `projects` or `sidebar` key means "not loaded yet", which the
//! palette treats the same as an empty collection.
//!
//! ```json
//! {
//!   "projects": [{ "id": "p1", "name": "Backend", "path": "~/src/backend" }],
//!   "sidebar": [{ "id": "p1", "name": "Backend", "tasks": [] }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::types::{Project, SidebarProject};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read workspace snapshot: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse workspace snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<Vec<SidebarProject>>,
}

impl WorkspaceSnapshot {
    pub fn load_from(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Split into shared collections, keeping "not loaded" as `None`.
    pub fn into_shared(self) -> (Option<Arc<[Project]>>, Option<Arc<[SidebarProject]>>) {
        (
            self.projects.map(Arc::from),
            self.sidebar.map(Arc::from),
        )
    }
}
