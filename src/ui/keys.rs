//! Backend-neutral key events plus the textual key-script format used by
//! `taskdeck replay`.
//!
//! Scripts are comma-separated tokens: named keys (`down`, `up`, `enter`,
//! `esc`, `backspace`, `tab`, `space`), modifier chords (`ctrl+k`, `cmd+k`,
//! `ctrl+u`), single characters (`r`), or literal text (`text:review`).

use std::fmt;
use std::ops::BitOr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Up,
    Down,
    Backspace,
    Tab,
}

/// Modifier set, combined with `|`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const ALT: Modifiers = Modifiers(0b0010);
    pub const SHIFT: Modifiers = Modifiers(0b0100);
    /// Cmd on macOS, Win/Super elsewhere.
    pub const SUPER: Modifiers = Modifiers(0b1000);

    pub const fn empty() -> Self {
        Modifiers(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl+"),
            (Modifiers::ALT, "alt+"),
            (Modifiers::SHIFT, "shift+"),
            (Modifiers::SUPER, "cmd+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Escape => f.write_str("esc"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Tab => f.write_str("tab"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeySpecError {
    #[error("empty key token at position {0}")]
    Empty(usize),

    #[error("unknown key `{0}`")]
    UnknownKey(String),

    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
}

/// Parse a comma-separated key script into events, in order.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>, KeySpecError> {
    let mut events = Vec::new();
    for (pos, raw) in script.split(',').enumerate() {
        // `text:` keeps its payload verbatim, spaces included.
        if let Some(text) = raw.trim_start().strip_prefix("text:") {
            events.extend(text.chars().map(|c| KeyEvent::plain(KeyCode::Char(c))));
            continue;
        }
        let token = raw.trim();
        if token.is_empty() {
            return Err(KeySpecError::Empty(pos));
        }
        events.push(parse_key(token)?);
    }
    Ok(events)
}

/// Parse one token such as `ctrl+k`, `down` or `x`.
pub fn parse_key(token: &str) -> Result<KeyEvent, KeySpecError> {
    let mut parts: Vec<&str> = token.split('+').collect();
    // A trailing `+` means the literal plus key (`ctrl++`).
    if token.ends_with("++") {
        parts.truncate(parts.len() - 2);
        parts.push("+");
    }
    let Some(key) = parts.pop() else {
        return Err(KeySpecError::UnknownKey(token.to_string()));
    };

    let mut modifiers = Modifiers::empty();
    for name in parts {
        modifiers = modifiers
            | match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifiers::CTRL,
                "alt" | "option" => Modifiers::ALT,
                "shift" => Modifiers::SHIFT,
                "cmd" | "super" | "meta" => Modifiers::SUPER,
                _ => return Err(KeySpecError::UnknownModifier(name.to_string())),
            };
    }

    let code = match key.to_ascii_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Escape,
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(KeySpecError::UnknownKey(key.to_string())),
            }
        }
    };

    Ok(KeyEvent::new(code, modifiers))
}
