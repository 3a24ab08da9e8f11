//! Minimal line-mode terminal host for the palette, built on `console`.
//! It is a manual test bench, not a layout engine: it redraws the
//! [`PaletteView`](super::render::PaletteView) below the cursor after every
//! key.

use anyhow::{Context, Result};
use console::{Key, Term, style};

use super::keys::{KeyCode, KeyEvent, Modifiers};
use super::render::{PaletteView, render_palette};
use super::shell::{Navigator, Shell, ShellEvent};
use super::shortcuts;

/// Translate a `console` key into a palette key event.
pub fn key_from_console(key: &Key) -> Option<KeyEvent> {
    let event = match key {
        Key::ArrowDown => KeyEvent::plain(KeyCode::Down),
        Key::ArrowUp => KeyEvent::plain(KeyCode::Up),
        Key::Enter => KeyEvent::plain(KeyCode::Enter),
        Key::Escape => KeyEvent::plain(KeyCode::Escape),
        Key::Backspace => KeyEvent::plain(KeyCode::Backspace),
        Key::Tab => KeyEvent::plain(KeyCode::Tab),
        // Raw mode delivers Ctrl+<letter> as the matching C0 control byte.
        Key::Char(c) if ('\u{1}'..='\u{1a}').contains(c) => {
            let letter = char::from(b'a' + (*c as u8) - 1);
            KeyEvent::new(KeyCode::Char(letter), Modifiers::CTRL)
        }
        Key::Char(c) => KeyEvent::plain(KeyCode::Char(*c)),
        _ => return None,
    };
    Some(event)
}

fn draw(term: &Term, view: Option<&PaletteView>, status: &str) -> Result<usize> {
    let mut lines = Vec::new();
    match view {
        Some(view) => {
            let input = if view.input_is_placeholder {
                style(&view.input).dim().to_string()
            } else {
                style(&view.input).bold().to_string()
            };
            lines.push(format!("{} {input}", style("/").cyan()));
            for row in &view.rows {
                let line = row.to_line();
                if row.selected {
                    lines.push(style(line).reverse().to_string());
                } else {
                    lines.push(line);
                }
            }
            lines.push(
                style(format!("{}  {}", view.footer, shortcuts::palette_hint()))
                    .dim()
                    .to_string(),
            );
        }
        None => lines.push(
            style(format!(
                "Press {} to open the palette, Ctrl+C to quit",
                shortcuts::palette_label()
            ))
            .dim()
            .to_string(),
        ),
    }
    if !status.is_empty() {
        lines.push(status.to_string());
    }
    for line in &lines {
        term.write_line(line)?;
    }
    Ok(lines.len())
}

/// Run until Ctrl+C. Navigation requests are reported on a status line.
pub fn run_interactive<N: Navigator>(shell: &mut Shell<N>) -> Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        anyhow::bail!("interactive mode needs a terminal on stdout");
    }
    term.hide_cursor().context("hiding cursor")?;

    let result = event_loop(&term, shell);

    term.show_cursor().context("restoring cursor")?;
    result
}

fn event_loop<N: Navigator>(term: &Term, shell: &mut Shell<N>) -> Result<()> {
    let mut status = String::new();
    loop {
        let view = shell
            .palette()
            .map(|palette| render_palette(palette, shell.config()));
        let drawn = draw(term, view.as_ref(), &status)?;

        let key = term.read_key().context("reading key")?;
        term.clear_last_lines(drawn)?;
        if key == Key::CtrlC {
            return Ok(());
        }
        let Some(event) = key_from_console(&key) else {
            continue;
        };

        let outcome = shell.handle_key(&event);
        for event in outcome.events {
            match event {
                ShellEvent::Navigated(destination) => {
                    status = format!("→ {destination}");
                }
                ShellEvent::NavigationFailed { destination, error } => {
                    status = format!("✗ {destination}: {error}");
                }
                ShellEvent::Opened => status.clear(),
                ShellEvent::FocusInput | ShellEvent::Closed => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_editing_keys_map() {
        assert_eq!(
            key_from_console(&Key::ArrowDown),
            Some(KeyEvent::plain(KeyCode::Down))
        );
        assert_eq!(
            key_from_console(&Key::Escape),
            Some(KeyEvent::plain(KeyCode::Escape))
        );
        assert_eq!(
            key_from_console(&Key::Char('x')),
            Some(KeyEvent::plain(KeyCode::Char('x')))
        );
    }

    #[test]
    fn control_bytes_become_ctrl_chords() {
        assert_eq!(key_from_console(&Key::Char('\u{b}')), Some(KeyEvent::ctrl('k')));
        assert_eq!(key_from_console(&Key::Char('\u{15}')), Some(KeyEvent::ctrl('u')));
        assert!(shortcuts::is_palette_toggle(
            &key_from_console(&Key::Char('\u{b}')).unwrap()
        ));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        assert_eq!(key_from_console(&Key::Unknown), None);
    }
}
