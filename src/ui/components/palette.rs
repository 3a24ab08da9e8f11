//! Command palette state: query, filtered view and keyboard selection.
//! Integration lives in `src/ui/shell.rs`; this module stays side-effect free
//! and reports what should happen through [`PaletteEffect`].
//!
//! # Interaction Contract
//!
//! | Trigger          | Behavior                                           |
//! |------------------|----------------------------------------------------|
//! | Ctrl+K / Cmd+K   | Handled by the shell (global toggle)               |
//! | Esc              | Close, no activation                               |
//! | Enter            | Activate selected item → close; no-op when empty   |
//! | Up               | Move selection -1 (clamps at 0, no wrap)           |
//! | Down             | Move selection +1 (clamps at last row, no wrap)    |
//! | Ctrl+U           | Clear query                                        |
//! | Any printable    | Append to query → refilter → reset selection to 0  |
//! | Backspace        | Remove last char → refilter → reset selection to 0 |
//!
//! Every bound key is reported as handled so the host suppresses its default
//! behavior (scrolling, form submit).

use std::sync::Arc;

use super::command_index::{CommandItem, filter_items};
use super::viewport::Viewport;
use crate::ui::keys::{KeyCode, KeyEvent, Modifiers};

/// Inputs the palette reacts to, from keyboard or pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteMsg {
    /// Replace the whole query (e.g. paste, or a host-managed text field).
    QueryChanged(String),
    InputChar(char),
    Backspace,
    ClearQuery,
    MoveDown,
    MoveUp,
    Confirm,
    Cancel,
    /// Pointer activation of a row in the filtered list.
    RowClicked(usize),
    BackdropClicked,
}

/// What the owner of the palette must do after an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteEffect {
    None,
    /// Dispatch this item's destination, then close.
    Activate(CommandItem),
    Close,
}

#[derive(Clone, Debug)]
pub struct PaletteState {
    query: String,
    items: Arc<[CommandItem]>,
    filtered: Arc<[CommandItem]>,
    selected: usize,
    viewport: Viewport,
}

impl PaletteState {
    pub fn new(items: Arc<[CommandItem]>, visible_rows: usize) -> Self {
        Self {
            query: String::new(),
            filtered: Arc::clone(&items),
            items,
            selected: 0,
            viewport: Viewport::new(visible_rows),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The full index this session filters over.
    pub fn items(&self) -> &Arc<[CommandItem]> {
        &self.items
    }

    pub fn filtered(&self) -> &[CommandItem] {
        &self.filtered
    }

    /// Highlighted row, or `None` when nothing matches.
    pub fn selected(&self) -> Option<usize> {
        (!self.filtered.is_empty()).then_some(self.selected)
    }

    pub fn selected_item(&self) -> Option<&CommandItem> {
        self.filtered.get(self.selected)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Any edit to the query: refilter and jump back to the first row, even
    /// if the previously highlighted item still matches.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
        self.selected = 0;
        self.viewport.reset();
    }

    /// Swap in a rebuilt index (upstream data arrived) without touching the
    /// query. The selection is kept but clamped to the new length.
    pub fn replace_items(&mut self, items: Arc<[CommandItem]>) {
        self.items = items;
        self.refilter();
        self.clamp_selection();
    }

    /// Recompute the filtered view. A blank query shares the index itself.
    fn refilter(&mut self) {
        self.filtered = match filter_items(&self.items, &self.query) {
            std::borrow::Cow::Borrowed(_) => Arc::clone(&self.items),
            std::borrow::Cow::Owned(matches) => Arc::from(matches),
        };
    }

    fn clamp_selection(&mut self) {
        let last = self.filtered.len().saturating_sub(1);
        if self.selected > last {
            self.selected = last;
        }
        self.viewport.scroll_into_view(self.selected);
    }

    /// Move the highlight by `delta`, clamped to the list bounds.
    pub fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.filtered.len() - 1;
        let next = self.selected.saturating_add_signed(delta).min(last);
        if next != self.selected {
            self.selected = next;
            self.viewport.scroll_into_view(next);
        }
    }

    pub fn update(&mut self, msg: PaletteMsg) -> PaletteEffect {
        match msg {
            PaletteMsg::QueryChanged(query) => {
                self.set_query(query);
                PaletteEffect::None
            }
            PaletteMsg::InputChar(c) => {
                let mut query = std::mem::take(&mut self.query);
                query.push(c);
                self.set_query(query);
                PaletteEffect::None
            }
            PaletteMsg::Backspace => {
                if !self.query.is_empty() {
                    let mut query = std::mem::take(&mut self.query);
                    query.pop();
                    self.set_query(query);
                }
                PaletteEffect::None
            }
            PaletteMsg::ClearQuery => {
                if !self.query.is_empty() {
                    self.set_query(String::new());
                }
                PaletteEffect::None
            }
            PaletteMsg::MoveDown => {
                self.move_selection(1);
                PaletteEffect::None
            }
            PaletteMsg::MoveUp => {
                self.move_selection(-1);
                PaletteEffect::None
            }
            PaletteMsg::Confirm => match self.selected_item() {
                Some(item) => PaletteEffect::Activate(item.clone()),
                None => PaletteEffect::None,
            },
            PaletteMsg::Cancel | PaletteMsg::BackdropClicked => PaletteEffect::Close,
            PaletteMsg::RowClicked(row) => match self.filtered.get(row) {
                Some(item) => {
                    let item = item.clone();
                    self.selected = row;
                    PaletteEffect::Activate(item)
                }
                None => PaletteEffect::None,
            },
        }
    }

    /// Map a key to a palette message. `None` means the key is not ours and
    /// its default behavior should proceed.
    pub fn key_to_msg(key: &KeyEvent) -> Option<PaletteMsg> {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        let alt = key.modifiers.contains(Modifiers::ALT);
        let cmd = key.modifiers.contains(Modifiers::SUPER);
        match key.code {
            KeyCode::Down => Some(PaletteMsg::MoveDown),
            KeyCode::Up => Some(PaletteMsg::MoveUp),
            KeyCode::Enter => Some(PaletteMsg::Confirm),
            KeyCode::Escape => Some(PaletteMsg::Cancel),
            KeyCode::Backspace => Some(PaletteMsg::Backspace),
            KeyCode::Char('u') if ctrl => Some(PaletteMsg::ClearQuery),
            KeyCode::Char(c) if !ctrl && !alt && !cmd && !c.is_control() => {
                Some(PaletteMsg::InputChar(c))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::command_index::{Destination, ItemKind};

    fn item(id: &str, label: &str, detail: Option<&str>) -> CommandItem {
        CommandItem {
            id: id.to_string(),
            kind: ItemKind::Task,
            label: label.to_string(),
            detail: detail.map(str::to_string),
            icon: '○',
            target: Destination::Task {
                task_id: id.to_string(),
            },
        }
    }

    fn state(labels: &[&str]) -> PaletteState {
        let items: Vec<CommandItem> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| item(&format!("t{i}"), l, None))
            .collect();
        PaletteState::new(Arc::from(items), 10)
    }

    // ==================== PaletteState::new tests ====================

    #[test]
    fn new_state_shares_index_as_filtered_view() {
        let s = state(&["Alpha", "Beta"]);
        assert!(Arc::ptr_eq(s.items(), &s.filtered));
        assert_eq!(s.selected(), Some(0));
        assert!(s.query().is_empty());
    }

    #[test]
    fn new_empty_state_has_no_selection() {
        let s = state(&[]);
        assert_eq!(s.selected(), None);
        assert!(s.selected_item().is_none());
    }

    // ==================== query tests ====================

    #[test]
    fn typing_refilters_and_resets_selection() {
        let mut s = state(&["Alpha", "Beta", "Alphabet"]);
        s.update(PaletteMsg::MoveDown);
        s.update(PaletteMsg::MoveDown);
        assert_eq!(s.selected(), Some(2));

        s.update(PaletteMsg::InputChar('a'));
        s.update(PaletteMsg::InputChar('l'));
        assert_eq!(s.query(), "al");
        let labels: Vec<&str> = s.filtered().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Alphabet"]);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn query_change_resets_even_when_item_still_matches() {
        let mut s = state(&["Fix login", "Fix logout", "Fix lint"]);
        s.set_query("fix");
        s.update(PaletteMsg::MoveDown);
        assert_eq!(s.selected_item().unwrap().label, "Fix logout");

        s.update(PaletteMsg::InputChar(' '));
        assert_eq!(s.filtered().len(), 3);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn blank_query_restores_shared_index() {
        let mut s = state(&["Alpha", "Beta"]);
        s.set_query("beta");
        assert_eq!(s.filtered().len(), 1);
        s.update(PaletteMsg::ClearQuery);
        assert!(Arc::ptr_eq(s.items(), &s.filtered));
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut s = state(&["Alpha", "Beta"]);
        s.set_query("bx");
        assert!(s.filtered().is_empty());
        s.update(PaletteMsg::Backspace);
        assert_eq!(s.query(), "b");
        assert_eq!(s.filtered().len(), 1);
    }

    #[test]
    fn backspace_on_empty_query_keeps_selection() {
        let mut s = state(&["Alpha", "Beta"]);
        s.update(PaletteMsg::MoveDown);
        s.update(PaletteMsg::Backspace);
        assert_eq!(s.selected(), Some(1));
    }

    // ==================== move_selection tests ====================

    #[test]
    fn move_down_clamps_without_wrap() {
        let mut s = state(&["A", "B", "C"]);
        for _ in 0..5 {
            s.update(PaletteMsg::MoveDown);
        }
        assert_eq!(s.selected(), Some(2));
    }

    #[test]
    fn move_up_clamps_without_wrap() {
        let mut s = state(&["A", "B", "C"]);
        s.update(PaletteMsg::MoveUp);
        assert_eq!(s.selected(), Some(0));
        s.move_selection(2);
        s.move_selection(-7);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn move_on_empty_list_is_harmless() {
        let mut s = state(&[]);
        s.update(PaletteMsg::MoveDown);
        s.update(PaletteMsg::MoveUp);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn move_on_single_item_stays_put() {
        let mut s = state(&["Only"]);
        s.update(PaletteMsg::MoveDown);
        assert_eq!(s.selected(), Some(0));
        s.update(PaletteMsg::MoveUp);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn selection_scrolls_viewport() {
        let items: Vec<CommandItem> = (0..20)
            .map(|i| item(&format!("t{i}"), &format!("Task {i}"), None))
            .collect();
        let mut s = PaletteState::new(Arc::from(items), 4);
        for _ in 0..6 {
            s.update(PaletteMsg::MoveDown);
        }
        assert_eq!(s.selected(), Some(6));
        assert_eq!(s.viewport().offset(), 3);
        assert_eq!(s.viewport().visible_range(20), 3..7);

        s.update(PaletteMsg::InputChar('1'));
        assert_eq!(s.viewport().offset(), 0);
    }

    // ==================== activation tests ====================

    #[test]
    fn confirm_activates_selected_item() {
        let mut s = state(&["A", "B"]);
        s.update(PaletteMsg::MoveDown);
        match s.update(PaletteMsg::Confirm) {
            PaletteEffect::Activate(item) => assert_eq!(item.label, "B"),
            other => panic!("expected activation, got {other:?}"),
        }
    }

    #[test]
    fn confirm_on_empty_list_is_noop() {
        let mut s = state(&["A"]);
        s.set_query("zzz");
        assert_eq!(s.update(PaletteMsg::Confirm), PaletteEffect::None);
    }

    #[test]
    fn cancel_and_backdrop_close() {
        let mut s = state(&["A"]);
        s.set_query("a");
        assert_eq!(s.update(PaletteMsg::Cancel), PaletteEffect::Close);
        assert_eq!(s.update(PaletteMsg::BackdropClicked), PaletteEffect::Close);
    }

    #[test]
    fn row_click_activates_that_row() {
        let mut s = state(&["A", "B", "C"]);
        match s.update(PaletteMsg::RowClicked(2)) {
            PaletteEffect::Activate(item) => assert_eq!(item.label, "C"),
            other => panic!("expected activation, got {other:?}"),
        }
        assert_eq!(s.selected(), Some(2));
        assert_eq!(s.update(PaletteMsg::RowClicked(9)), PaletteEffect::None);
    }

    // ==================== replace_items tests ====================

    #[test]
    fn replace_items_keeps_query_and_clamps() {
        let mut s = state(&["Task a", "Task b", "Task c"]);
        s.set_query("task");
        s.update(PaletteMsg::MoveDown);
        s.update(PaletteMsg::MoveDown);

        s.replace_items(Arc::from(vec![item("x", "Task x", None)]));
        assert_eq!(s.query(), "task");
        assert_eq!(s.selected(), Some(0));
        assert_eq!(s.filtered().len(), 1);
    }

    // ==================== key_to_msg tests ====================

    #[test]
    fn navigation_keys_map_to_messages() {
        let key = |code| KeyEvent::plain(code);
        assert_eq!(PaletteState::key_to_msg(&key(KeyCode::Down)), Some(PaletteMsg::MoveDown));
        assert_eq!(PaletteState::key_to_msg(&key(KeyCode::Up)), Some(PaletteMsg::MoveUp));
        assert_eq!(PaletteState::key_to_msg(&key(KeyCode::Enter)), Some(PaletteMsg::Confirm));
        assert_eq!(PaletteState::key_to_msg(&key(KeyCode::Escape)), Some(PaletteMsg::Cancel));
        assert_eq!(
            PaletteState::key_to_msg(&KeyEvent::ctrl('u')),
            Some(PaletteMsg::ClearQuery)
        );
    }

    #[test]
    fn printable_keys_become_input() {
        assert_eq!(
            PaletteState::key_to_msg(&KeyEvent::plain(KeyCode::Char('r'))),
            Some(PaletteMsg::InputChar('r'))
        );
        assert_eq!(
            PaletteState::key_to_msg(&KeyEvent::new(KeyCode::Char('R'), Modifiers::SHIFT)),
            Some(PaletteMsg::InputChar('R'))
        );
    }

    #[test]
    fn unbound_keys_are_not_handled() {
        assert_eq!(PaletteState::key_to_msg(&KeyEvent::plain(KeyCode::Tab)), None);
        assert_eq!(PaletteState::key_to_msg(&KeyEvent::ctrl('x')), None);
        assert_eq!(
            PaletteState::key_to_msg(&KeyEvent::new(KeyCode::Char('k'), Modifiers::ALT)),
            None
        );
    }
}
