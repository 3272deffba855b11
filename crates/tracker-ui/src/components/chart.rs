use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Two-slice present/absent attendance visualisation.
///
/// Renders a proportional split bar — one contiguous coloured segment per
/// slice — followed by a legend line per slice. Consumes only the two
/// counts; everything upstream of `(present, absent)` is the caller's
/// business.
pub struct AttendanceChart<'a> {
    /// Students recorded present.
    pub present: usize,
    /// Students not recorded present (absent or unmarked).
    pub absent: usize,
    /// Theme from which the slice colours are taken.
    pub theme: &'a Theme,
    /// Total width of the bar in terminal columns.
    pub width: u16,
}

impl<'a> AttendanceChart<'a> {
    /// Construct a new chart with the default 50-column width.
    pub fn new(present: usize, absent: usize, theme: &'a Theme) -> Self {
        Self {
            present,
            absent,
            theme,
            width: 50,
        }
    }

    /// Percentage of the present slice, `0.0` when both counts are zero.
    fn present_share(&self) -> f64 {
        let total = self.present + self.absent;
        if total == 0 {
            0.0
        } else {
            (self.present as f64 / total as f64) * 100.0
        }
    }

    /// Render the chart as three [`Line`]s: the split bar and one legend
    /// line per slice.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let share = self.present_share();
        let present_cols = ((share / 100.0) * self.width as f64).round() as usize;
        let absent_cols = (self.width as usize).saturating_sub(present_cols);

        let bar = Line::from(vec![
            Span::styled("█".repeat(present_cols), self.theme.chart_present),
            Span::styled("█".repeat(absent_cols), self.theme.chart_absent),
        ]);

        let present_legend = Line::from(vec![
            Span::styled("  ■ ", self.theme.chart_present),
            Span::styled(
                format!("Present: {} ({:.1}%)", self.present, share),
                self.theme.text,
            ),
        ]);
        let absent_legend = Line::from(vec![
            Span::styled("  ■ ", self.theme.chart_absent),
            Span::styled(
                format!("Absent: {} ({:.1}%)", self.absent, 100.0 - share),
                self.theme.text,
            ),
        ]);

        vec![bar, present_legend, absent_legend]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
