//! Flat command index: aggregation of actions, projects and the sidebar tree
//! into one ordered list, plus the substring filter over it.
//!
//! # Ordering
//!
//! | Position | Source                                             |
//! |----------|----------------------------------------------------|
//! | 1        | Static actions, declaration order                  |
//! | 2        | Flat project list, source order                    |
//! | 3        | Sidebar: per project, each task then its sessions  |
//!
//! Ids are namespaced by kind (`action-*`, `project-*`, `task-*`,
//! `session-*`) and derived only from entity ids, so an item keeps its id
//! across rebuilds even when its position moves.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::model::types::{
    Project, STATUS_IN_REVIEW, STATUS_WAITING_FOR_INPUT, SidebarProject, humanize_status,
};

/// Closed set of item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Action,
    Project,
    Task,
    Session,
}

impl ItemKind {
    /// Namespace prefix used in item ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Project => "project",
            Self::Task => "task",
            Self::Session => "session",
        }
    }

    pub const ALL: &'static [ItemKind] = &[
        ItemKind::Action,
        ItemKind::Project,
        ItemKind::Task,
        ItemKind::Session,
    ];
}

/// Where activating an item takes the user. This is the payload handed to
/// the navigator; items never carry executable state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    Dashboard,
    Settings,
    /// Dashboard filtered to one project.
    Project {
        project_id: String,
    },
    Task {
        task_id: String,
    },
    Session {
        task_id: String,
        session_id: String,
    },
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Settings => write!(f, "settings"),
            Self::Project { project_id } => write!(f, "project:{project_id}"),
            Self::Task { task_id } => write!(f, "task:{task_id}"),
            Self::Session {
                task_id,
                session_id,
            } => write!(f, "session:{task_id}/{session_id}"),
        }
    }
}

/// Compiled-in actions the palette always offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteAction {
    GoToDashboard,
    OpenSettings,
}

impl PaletteAction {
    /// Default actions in display order.
    pub const ALL: &'static [PaletteAction] =
        &[PaletteAction::GoToDashboard, PaletteAction::OpenSettings];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::GoToDashboard => "dashboard",
            Self::OpenSettings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GoToDashboard => "Go to dashboard",
            Self::OpenSettings => "Open settings",
        }
    }

    pub fn destination(&self) -> Destination {
        match self {
            Self::GoToDashboard => Destination::Dashboard,
            Self::OpenSettings => Destination::Settings,
        }
    }
}

/// One selectable row of the flat index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandItem {
    pub id: String,
    pub kind: ItemKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub icon: char,
    pub target: Destination,
}

impl CommandItem {
    /// Case-insensitive substring match against label, then detail.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self
                .detail
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

// -------------------------------------------------------------------------
// Icons
// -------------------------------------------------------------------------

pub mod icons {
    pub const ACTION: char = '›';
    pub const PROJECT: char = '▣';
    pub const TASK: char = '○';
    pub const TASK_IN_REVIEW: char = '◉';
    pub const SESSION: char = '▷';
    pub const SESSION_WAITING: char = '◆';
}

/// Icon for an item. Only two statuses are distinguished: tasks in review
/// and sessions waiting for input. Everything else gets the kind default.
pub fn icon_for(kind: ItemKind, status: Option<&str>) -> char {
    match (kind, status) {
        (ItemKind::Task, Some(STATUS_IN_REVIEW)) => icons::TASK_IN_REVIEW,
        (ItemKind::Session, Some(STATUS_WAITING_FOR_INPUT)) => icons::SESSION_WAITING,
        (ItemKind::Action, _) => icons::ACTION,
        (ItemKind::Project, _) => icons::PROJECT,
        (ItemKind::Task, _) => icons::TASK,
        (ItemKind::Session, _) => icons::SESSION,
    }
}

// -------------------------------------------------------------------------
// Aggregation
// -------------------------------------------------------------------------

/// Build the flat index. `None` collections are "not loaded yet" and
/// contribute nothing. Pure: same inputs, same output.
pub fn build_index(
    actions: &[PaletteAction],
    projects: Option<&[Project]>,
    sidebar: Option<&[SidebarProject]>,
) -> Vec<CommandItem> {
    let projects = projects.unwrap_or_default();
    let sidebar = sidebar.unwrap_or_default();

    let nested: usize = sidebar
        .iter()
        .flat_map(|p| &p.tasks)
        .map(|t| 1 + t.sessions.len())
        .sum();
    let mut items = Vec::with_capacity(actions.len() + projects.len() + nested);

    for action in actions {
        items.push(CommandItem {
            id: format!("{}-{}", ItemKind::Action.id_prefix(), action.slug()),
            kind: ItemKind::Action,
            label: action.label().to_string(),
            detail: None,
            icon: icon_for(ItemKind::Action, None),
            target: action.destination(),
        });
    }

    for project in projects {
        items.push(CommandItem {
            id: format!("{}-{}", ItemKind::Project.id_prefix(), project.id),
            kind: ItemKind::Project,
            label: project.name.clone(),
            detail: Some(project.path.clone()),
            icon: icon_for(ItemKind::Project, None),
            target: Destination::Project {
                project_id: project.id.clone(),
            },
        });
    }

    for project in sidebar {
        for task in &project.tasks {
            items.push(CommandItem {
                id: format!("{}-{}", ItemKind::Task.id_prefix(), task.id),
                kind: ItemKind::Task,
                label: task.title.clone(),
                detail: Some(format!(
                    "{} · {}",
                    project.name,
                    humanize_status(&task.status)
                )),
                icon: icon_for(ItemKind::Task, Some(&task.status)),
                target: Destination::Task {
                    task_id: task.id.clone(),
                },
            });

            for session in &task.sessions {
                items.push(CommandItem {
                    id: format!("{}-{}", ItemKind::Session.id_prefix(), session.id),
                    kind: ItemKind::Session,
                    label: format!("{} #{}", session.provider, session.number),
                    detail: Some(format!(
                        "{} · {}",
                        task.title,
                        humanize_status(&session.status)
                    )),
                    icon: icon_for(ItemKind::Session, Some(&session.status)),
                    target: Destination::Session {
                        task_id: task.id.clone(),
                        session_id: session.id.clone(),
                    },
                });
            }
        }
    }

    items
}

// -------------------------------------------------------------------------
// Sources + memoized rebuild
// -------------------------------------------------------------------------

/// The three upstream inputs, shared by reference. Identity (`Arc` pointer)
/// is what decides whether the index must be rebuilt.
#[derive(Clone, Debug)]
pub struct PaletteSources {
    pub actions: Arc<[PaletteAction]>,
    pub projects: Option<Arc<[Project]>>,
    pub sidebar: Option<Arc<[SidebarProject]>>,
}

impl Default for PaletteSources {
    fn default() -> Self {
        Self {
            actions: Arc::from(PaletteAction::ALL),
            projects: None,
            sidebar: None,
        }
    }
}

impl PaletteSources {
    pub fn new(
        projects: Option<Arc<[Project]>>,
        sidebar: Option<Arc<[SidebarProject]>>,
    ) -> Self {
        Self {
            projects,
            sidebar,
            ..Self::default()
        }
    }

    /// True when every input is the very same allocation as in `other`.
    pub fn same_inputs(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.actions, &other.actions)
            && same_arc(&self.projects, &other.projects)
            && same_arc(&self.sidebar, &other.sidebar)
    }

    pub fn build(&self) -> Vec<CommandItem> {
        build_index(
            &self.actions,
            self.projects.as_deref(),
            self.sidebar.as_deref(),
        )
    }
}

fn same_arc<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Memoizes the last build. Rebuilds only when an input reference changed;
/// the filter query is not an input.
#[derive(Debug, Default)]
pub struct IndexCache {
    last: Option<(PaletteSources, Arc<[CommandItem]>)>,
    builds: u64,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, sources: &PaletteSources) -> Arc<[CommandItem]> {
        if let Some((cached_sources, items)) = &self.last
            && cached_sources.same_inputs(sources)
        {
            return Arc::clone(items);
        }

        let items: Arc<[CommandItem]> = Arc::from(sources.build());
        self.builds += 1;
        tracing::debug!(
            items = items.len(),
            builds = self.builds,
            "rebuilt command index"
        );
        self.last = Some((sources.clone(), Arc::clone(&items)));
        items
    }

    /// Number of builds performed since creation.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Drop the memoized index.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

// -------------------------------------------------------------------------
// Filter
// -------------------------------------------------------------------------

/// Filter `items` by case-insensitive substring over label and detail.
///
/// A blank query borrows `items` untouched. Otherwise the result is the
/// order-preserving subsequence of matches.
pub fn filter_items<'a>(items: &'a [CommandItem], query: &str) -> Cow<'a, [CommandItem]> {
    if query.trim().is_empty() {
        return Cow::Borrowed(items);
    }
    let needle = query.to_lowercase();
    Cow::Owned(
        items
            .iter()
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect(),
    )
}
