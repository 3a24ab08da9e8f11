//! Keyboard shortcut labels and matchers shared by the shell and the help
//! text. Labels are what users see; matchers are what the shell checks.

use super::keys::{KeyCode, KeyEvent, Modifiers};

pub const PALETTE: &str = "Ctrl+K";
pub const PALETTE_MAC: &str = "Cmd+K";
pub const MOVE_DOWN: &str = "Down";
pub const MOVE_UP: &str = "Up";
pub const CONFIRM: &str = "Enter";
pub const CANCEL: &str = "Esc";
pub const CLEAR_QUERY: &str = "Ctrl+U";

/// Key that pairs with the primary modifier to toggle the palette.
pub const PALETTE_KEY: char = 'k';

/// Ctrl or Cmd, without Alt. Shift is tolerated so caps-lock style input
/// (`Ctrl+K`) still toggles.
pub fn has_primary_modifier(modifiers: Modifiers) -> bool {
    (modifiers.contains(Modifiers::CTRL) || modifiers.contains(Modifiers::SUPER))
        && !modifiers.contains(Modifiers::ALT)
}

/// Whether `key` is the global open/close shortcut.
pub fn is_palette_toggle(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&PALETTE_KEY))
        && has_primary_modifier(key.modifiers)
}

/// Platform-appropriate label for the toggle shortcut.
pub fn palette_label() -> &'static str {
    if cfg!(target_os = "macos") {
        PALETTE_MAC
    } else {
        PALETTE
    }
}

/// One-line key legend shown under the open palette.
pub fn palette_hint() -> String {
    format!(
        "{MOVE_UP}/{MOVE_DOWN} move · {CONFIRM} open · {CANCEL} close · {CLEAR_QUERY} clear"
    )
}
