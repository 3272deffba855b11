//! Session entry form for the attendance tracker TUI.
//!
//! Renders one slot per configured student with a name input and a
//! tri-state status selector, plus the validation banner and key hints.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use tracker_core::models::SessionEntry;

use crate::components::header::Header;
use crate::themes::Theme;

/// Display width of the name input cell in terminal columns.
const NAME_CELL_WIDTH: usize = 24;

/// Everything the form screen needs to render one frame.
pub struct FormViewData<'a> {
    /// Current slot contents, one per configured student.
    pub entries: &'a [SessionEntry],
    /// Index of the focused slot.
    pub focused: usize,
    /// `true` when focus is on the status selector instead of the name.
    pub status_column: bool,
    /// Session date in display format.
    pub date: &'a str,
    /// Records file path shown in the header.
    pub records_path: &'a str,
    /// Validation banner, e.g. the missing-names message.
    pub warning: Option<&'a str>,
    /// Informational banner, e.g. the save confirmation.
    pub info: Option<&'a str>,
}

/// Pad `name` to the fixed input cell width, accounting for wide glyphs.
fn pad_name_cell(name: &str) -> String {
    let width = UnicodeWidthStr::width(name);
    let padding = NAME_CELL_WIDTH.saturating_sub(width);
    format!("{}{}", name, " ".repeat(padding))
}

/// Build the form screen as a list of lines.
///
/// `visible_slots` bounds how many student rows fit; the window scrolls to
/// keep the focused slot in view.
pub fn form_lines<'a>(
    data: &FormViewData<'a>,
    theme: &'a Theme,
    visible_slots: usize,
) -> Vec<Line<'a>> {
    let mut lines = Header::new(data.date, data.records_path, theme).to_lines();

    lines.push(Line::from(Span::styled(
        format!("Enter details for {} students", data.entries.len()),
        theme.bold,
    )));
    lines.push(Line::from(""));

    // Scroll window: keep the focused slot visible.
    let visible = visible_slots.max(1);
    let start = if data.focused + 1 > visible {
        data.focused + 1 - visible
    } else {
        0
    };
    let end = (start + visible).min(data.entries.len());

    for (i, entry) in data.entries.iter().enumerate().take(end).skip(start) {
        let is_focused_slot = i == data.focused;

        let name_style = if is_focused_slot && !data.status_column {
            theme.input_active
        } else {
            theme.input_inactive
        };
        let status_style = if is_focused_slot && data.status_column {
            theme.input_active
        } else {
            theme.status_style(entry.status)
        };

        let marker = if is_focused_slot { "▶" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {:>3}. ", i + 1), theme.dim),
            Span::styled(pad_name_cell(&entry.name), name_style),
            Span::styled("  ", theme.text),
            Span::styled(format!("< {} >", entry.status.as_str()), status_style),
        ]));
    }

    if end < data.entries.len() {
        lines.push(Line::from(Span::styled(
            format!("  … {} more below", data.entries.len() - end),
            theme.dim,
        )));
    }

    lines.push(Line::from(""));
    if let Some(warning) = data.warning {
        lines.push(Line::from(Span::styled(warning.to_string(), theme.warning)));
    } else if let Some(info) = data.info {
        lines.push(Line::from(Span::styled(info.to_string(), theme.info)));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓ move · Tab name/status · Space cycle status · Ctrl+G report · F2 history · Esc quit",
        theme.dim,
    )));

    lines
}

/// Render the form screen into `area`.
pub fn render_form(frame: &mut Frame, area: Rect, data: &FormViewData, theme: &Theme) {
    // Lines other than the student slots: header (4), subtitle + blank (2),
    // banner block (3) and hints (1).
    let chrome_lines = 10usize;
    let visible_slots = (area.height as usize).saturating_sub(chrome_lines).max(1);

    let lines = form_lines(data, theme, visible_slots);
    frame.render_widget(Paragraph::new(lines).style(theme.text), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
