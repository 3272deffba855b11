use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Tracker screen header rendering four lines:
///
/// 1. Application title with sparkle decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Session date and records file path in `[ date | path ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Session date in DD-MM-YYYY display format.
    pub date: &'a str,
    /// Path of the records file backing the ledger.
    pub records_path: &'a str,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Construct a new header.
    pub fn new(date: &'a str, records_path: &'a str, theme: &'a Theme) -> Self {
        Self {
            date,
            records_path,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            // Title line.
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" ATTENDANCE TRACKER ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            // Separator line.
            Line::from(Span::styled(separator, self.theme.separator)),
            // Date / records path info line.
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.date, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.records_path, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            // Empty line.
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
