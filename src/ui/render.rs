//! Plain-text view model of the open palette. Hosts decide how to style it;
//! the terminal loop in `ui::terminal` is one such host.

use super::components::palette::PaletteState;
use crate::config::PaletteConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRow {
    /// Index into the filtered list (what `PointerEvent::Row` expects).
    pub index: usize,
    pub selected: bool,
    pub icon: char,
    pub label: String,
    pub detail: Option<String>,
}

impl RenderedRow {
    pub fn to_line(&self) -> String {
        let marker = if self.selected { '>' } else { ' ' };
        match &self.detail {
            Some(detail) => format!("{marker} {} {}  {detail}", self.icon, self.label),
            None => format!("{marker} {} {}", self.icon, self.label),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteView {
    /// Query text, or the placeholder when the query is empty.
    pub input: String,
    pub input_is_placeholder: bool,
    pub rows: Vec<RenderedRow>,
    /// `selected/total`, or `no matches`.
    pub footer: String,
}

impl PaletteView {
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!("/ {}", self.input));
        lines.extend(self.rows.iter().map(RenderedRow::to_line));
        lines.push(self.footer.clone());
        lines
    }
}

/// Build the view for the rows inside the palette's viewport.
pub fn render_palette(state: &PaletteState, config: &PaletteConfig) -> PaletteView {
    let filtered = state.filtered();
    let selected = state.selected();
    let rows = state
        .viewport()
        .visible_range(filtered.len())
        .map(|index| {
            let item = &filtered[index];
            RenderedRow {
                index,
                selected: selected == Some(index),
                icon: item.icon,
                label: item.label.clone(),
                detail: item.detail.clone().filter(|_| config.show_detail),
            }
        })
        .collect();

    let (input, input_is_placeholder) = if state.query().is_empty() {
        (config.placeholder.clone(), true)
    } else {
        (state.query().to_string(), false)
    };

    let footer = match selected {
        Some(index) => format!("{}/{}", index + 1, filtered.len()),
        None => "no matches".to_string(),
    };

    PaletteView {
        input,
        input_is_placeholder,
        rows,
        footer,
    }
}
