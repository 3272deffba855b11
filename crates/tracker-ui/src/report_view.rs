//! Session report screen: headline numbers, feedback tier and the
//! present/absent chart for the session that was just saved.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use tracker_core::models::{SessionEntry, SessionSummary};

use crate::components::chart::AttendanceChart;
use crate::components::header::Header;
use crate::themes::Theme;

/// Everything the report screen needs to render one frame.
pub struct ReportViewData<'a> {
    pub summary: &'a SessionSummary,
    /// The entries of the saved session, in form order.
    pub entries: &'a [SessionEntry],
    /// Session date in display format.
    pub date: &'a str,
    /// Records file path shown in the header.
    pub records_path: &'a str,
    /// Save confirmation, e.g. "Attendance saved for 01-01-2025!".
    pub info: Option<&'a str>,
    /// Export confirmation or failure banner.
    pub export_note: Option<&'a str>,
}

/// Build the report screen as a list of lines.
pub fn report_lines<'a>(data: &ReportViewData<'a>, theme: &'a Theme) -> Vec<Line<'a>> {
    let summary = data.summary;
    let mut lines = Header::new(data.date, data.records_path, theme).to_lines();

    lines.push(Line::from(Span::styled("SESSION REPORT", theme.bold)));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Total students: ", theme.label),
        Span::styled(summary.total_students.to_string(), theme.value),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Present:        ", theme.label),
        Span::styled(summary.present_count.to_string(), theme.success),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Absent:         ", theme.label),
        Span::styled(summary.absent_names.len().to_string(), theme.error),
    ]));

    if !summary.absent_names.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Absent students: ", theme.label),
            Span::styled(summary.absent_names.join(", "), theme.error),
        ]));
    }

    // Per-student listing of the saved session.
    lines.push(Line::from(""));
    for entry in data.entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", entry.name), theme.text),
            Span::styled(entry.status.as_str(), theme.status_style(entry.status)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Attendance: ", theme.label),
        Span::styled(
            format!("{}%", summary.attendance_percent),
            theme.tier_style(summary.tier),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        summary.tier.message(),
        theme.tier_style(summary.tier),
    )));
    lines.push(Line::from(""));

    let absent_share = summary.total_students - summary.present_count;
    let chart = AttendanceChart::new(summary.present_count, absent_share, theme);
    lines.extend(chart.to_lines());

    lines.push(Line::from(""));
    if let Some(note) = data.export_note {
        lines.push(Line::from(Span::styled(note.to_string(), theme.success)));
    } else if let Some(info) = data.info {
        lines.push(Line::from(Span::styled(info.to_string(), theme.info)));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "e export session CSV · b back to form · F2 history · Esc quit",
        theme.dim,
    )));

    lines
}

/// Render the report screen into `area`.
pub fn render_report(frame: &mut Frame, area: Rect, data: &ReportViewData, theme: &Theme) {
    let lines = report_lines(data, theme);
    frame.render_widget(Paragraph::new(lines).style(theme.text), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
