//! Application shell around the palette: the global Ctrl/Cmd+K toggle, the
//! process-wide shortcut listener, and activation dispatch.
//!
//! The palette session (`PaletteState`) only exists while the palette is
//! open. Closing drops it along with the memoized index, so nothing is
//! aggregated or filtered in the background.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::components::command_index::{
    CommandItem, Destination, IndexCache, PaletteAction, PaletteSources,
};
use super::components::palette::{PaletteEffect, PaletteMsg, PaletteState};
use super::keys::KeyEvent;
use super::shortcuts;
use crate::config::PaletteConfig;
use crate::model::types::{Project, SidebarProject};

// -------------------------------------------------------------------------
// Shortcut listener
// -------------------------------------------------------------------------

static LISTENER_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("palette shortcut listener is already registered")]
    AlreadyRegistered,
}

/// Registration of the global palette shortcut. At most one exists per
/// process; dropping it unregisters.
#[derive(Debug)]
pub struct ShortcutListener {
    _private: (),
}

impl ShortcutListener {
    pub fn register() -> Result<Self, ShortcutError> {
        LISTENER_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ShortcutError::AlreadyRegistered)?;
        debug!("palette shortcut listener registered");
        Ok(Self { _private: () })
    }

    pub fn is_registered() -> bool {
        LISTENER_ACTIVE.load(Ordering::Acquire)
    }
}

impl Drop for ShortcutListener {
    fn drop(&mut self) {
        LISTENER_ACTIVE.store(false, Ordering::Release);
        debug!("palette shortcut listener removed");
    }
}

// -------------------------------------------------------------------------
// Navigation seam
// -------------------------------------------------------------------------

/// Receives navigation requests produced by activation.
pub trait Navigator {
    fn navigate(&mut self, destination: &Destination) -> anyhow::Result<()>;
}

impl<F> Navigator for F
where
    F: FnMut(&Destination) -> anyhow::Result<()>,
{
    fn navigate(&mut self, destination: &Destination) -> anyhow::Result<()> {
        self(destination)
    }
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    destinations: Vec<Destination>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, destination: &Destination) -> anyhow::Result<()> {
        self.destinations.push(destination.clone());
        Ok(())
    }
}

// -------------------------------------------------------------------------
// Shell
// -------------------------------------------------------------------------

/// Externally observable results of handling an input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellEvent {
    Opened,
    /// The search input should take focus. Emitted once per open.
    FocusInput,
    Navigated(Destination),
    NavigationFailed {
        destination: Destination,
        error: String,
    },
    Closed,
}

/// Result of offering a key to the shell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The key was consumed; the host must suppress its default action.
    pub handled: bool,
    pub events: Vec<ShellEvent>,
}

impl KeyOutcome {
    fn handled(events: Vec<ShellEvent>) -> Self {
        Self {
            handled: true,
            events,
        }
    }

    fn ignored() -> Self {
        Self::default()
    }

    pub fn prevents_default(&self) -> bool {
        self.handled
    }
}

/// Pointer input on the palette overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Backdrop,
    Row(usize),
}

pub struct Shell<N: Navigator> {
    sources: PaletteSources,
    cache: IndexCache,
    palette: Option<PaletteState>,
    navigator: N,
    config: PaletteConfig,
    _listener: ShortcutListener,
}

impl<N: Navigator> Shell<N> {
    /// Mount the shell and register the global shortcut. Fails if another
    /// shell in this process already holds the listener.
    pub fn mount(navigator: N, config: PaletteConfig) -> Result<Self, ShortcutError> {
        let listener = ShortcutListener::register()?;
        Ok(Self {
            sources: PaletteSources::default(),
            cache: IndexCache::new(),
            palette: None,
            navigator,
            config,
            _listener: listener,
        })
    }

    pub fn is_open(&self) -> bool {
        self.palette.is_some()
    }

    /// The live palette session, if open.
    pub fn palette(&self) -> Option<&PaletteState> {
        self.palette.as_ref()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Number of index builds performed so far.
    pub fn index_builds(&self) -> u64 {
        self.cache.builds()
    }

    pub fn set_actions(&mut self, actions: Arc<[PaletteAction]>) {
        self.sources.actions = actions;
        self.refresh_index();
    }

    /// Upstream project list arrived or changed. `None` = not loaded.
    pub fn set_projects(&mut self, projects: Option<Arc<[Project]>>) {
        self.sources.projects = projects;
        self.refresh_index();
    }

    /// Upstream sidebar tree arrived or changed. `None` = not loaded.
    pub fn set_sidebar(&mut self, sidebar: Option<Arc<[SidebarProject]>>) {
        self.sources.sidebar = sidebar;
        self.refresh_index();
    }

    /// Rebuild only while mounted; when closed the new sources just wait for
    /// the next open.
    fn refresh_index(&mut self) {
        if let Some(palette) = self.palette.as_mut() {
            let items = self.cache.get_or_build(&self.sources);
            if !Arc::ptr_eq(&items, palette.items()) {
                palette.replace_items(items);
            }
        }
    }

    pub fn toggle(&mut self) -> Vec<ShellEvent> {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    fn open(&mut self) -> Vec<ShellEvent> {
        let items = self.cache.get_or_build(&self.sources);
        info!(items = items.len(), "palette opened");
        self.palette = Some(PaletteState::new(items, self.config.visible_rows));
        vec![ShellEvent::Opened, ShellEvent::FocusInput]
    }

    /// Close the palette. Idempotent: closing a closed palette does nothing.
    pub fn close(&mut self) -> Vec<ShellEvent> {
        match self.palette.take() {
            Some(_) => {
                self.cache.clear();
                info!("palette closed");
                vec![ShellEvent::Closed]
            }
            None => Vec::new(),
        }
    }

    /// Dispatch `item`'s destination, then close. A navigator error is
    /// logged and does not keep the palette open.
    pub fn activate(&mut self, item: &CommandItem) -> Vec<ShellEvent> {
        let mut events = Vec::with_capacity(2);
        match self.navigator.navigate(&item.target) {
            Ok(()) => {
                info!(id = %item.id, destination = %item.target, "palette item activated");
                events.push(ShellEvent::Navigated(item.target.clone()));
            }
            Err(err) => {
                warn!(id = %item.id, destination = %item.target, error = %err, "navigation failed");
                events.push(ShellEvent::NavigationFailed {
                    destination: item.target.clone(),
                    error: format!("{err:#}"),
                });
            }
        }
        events.extend(self.close());
        events
    }

    /// Offer a key to the shell. The toggle shortcut is checked first and
    /// works whether or not the palette is open.
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if shortcuts::is_palette_toggle(key) {
            return KeyOutcome::handled(self.toggle());
        }
        let Some(palette) = self.palette.as_mut() else {
            return KeyOutcome::ignored();
        };
        let Some(msg) = PaletteState::key_to_msg(key) else {
            return KeyOutcome::ignored();
        };
        let effect = palette.update(msg);
        KeyOutcome::handled(self.apply(effect))
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<ShellEvent> {
        let msg = match event {
            PointerEvent::Backdrop => PaletteMsg::BackdropClicked,
            PointerEvent::Row(row) => PaletteMsg::RowClicked(row),
        };
        self.send(msg)
    }

    /// Feed a message directly, e.g. from a host-managed text input.
    pub fn send(&mut self, msg: PaletteMsg) -> Vec<ShellEvent> {
        let Some(palette) = self.palette.as_mut() else {
            return Vec::new();
        };
        let effect = palette.update(msg);
        self.apply(effect)
    }

    fn apply(&mut self, effect: PaletteEffect) -> Vec<ShellEvent> {
        match effect {
            PaletteEffect::None => Vec::new(),
            PaletteEffect::Activate(item) => self.activate(&item),
            PaletteEffect::Close => self.close(),
        }
    }
}
