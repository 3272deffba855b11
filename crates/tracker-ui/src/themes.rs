use ratatui::style::{Color, Modifier, Style};

use tracker_core::models::{FeedbackTier, Status};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned as the safe
/// default.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by the tracker's
/// views and components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status messages ──────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Feedback tiers ───────────────────────────────────────────────────────
    /// Attendance below 75 %.
    pub tier_low: Style,
    /// Attendance between 75 % and 90 %.
    pub tier_medium: Style,
    /// Attendance at or above 90 %.
    pub tier_high: Style,

    // ── Attendance chart ─────────────────────────────────────────────────────
    pub chart_present: Style,
    pub chart_absent: Style,

    // ── Form ─────────────────────────────────────────────────────────────────
    pub input_active: Style,
    pub input_inactive: Style,
    pub status_present: Style,
    pub status_absent: Style,
    pub status_unmarked: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            tier_low: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            tier_medium: Style::default().fg(Color::Yellow),
            tier_high: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),

            chart_present: Style::default().fg(Color::Green),
            chart_absent: Style::default().fg(Color::Red),

            input_active: Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            input_inactive: Style::default().fg(Color::Gray),
            status_present: Style::default().fg(Color::Green),
            status_absent: Style::default().fg(Color::Red),
            status_unmarked: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and bright accent colours so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            tier_low: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            tier_medium: Style::default().fg(Color::Yellow),
            tier_high: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),

            chart_present: Style::default().fg(Color::Green),
            chart_absent: Style::default().fg(Color::Red),

            input_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            input_inactive: Style::default().fg(Color::DarkGray),
            status_present: Style::default().fg(Color::Green),
            status_absent: Style::default().fg(Color::Red),
            status_unmarked: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers to maintain a retro aesthetic and maximise
    /// compatibility with minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            tier_low: Style::default().fg(Color::Red),
            tier_medium: Style::default().fg(Color::Yellow),
            tier_high: Style::default().fg(Color::Green),

            chart_present: Style::default().fg(Color::Green),
            chart_absent: Style::default().fg(Color::Red),

            input_active: Style::default().fg(Color::Black).bg(Color::White),
            input_inactive: Style::default().fg(Color::Gray),
            status_present: Style::default().fg(Color::Green),
            status_absent: Style::default().fg(Color::Red),
            status_unmarked: Style::default().fg(Color::Gray),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style for a feedback tier message.
    pub fn tier_style(&self, tier: FeedbackTier) -> Style {
        match tier {
            FeedbackTier::Low => self.tier_low,
            FeedbackTier::Medium => self.tier_medium,
            FeedbackTier::High => self.tier_high,
        }
    }

    /// Style for an attendance status value.
    pub fn status_style(&self, status: Status) -> Style {
        match status {
            Status::Present => self.status_present,
            Status::Absent => self.status_absent,
            Status::Unmarked => self.status_unmarked,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
