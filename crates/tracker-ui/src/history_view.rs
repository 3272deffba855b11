//! Attendance history screen: the recorded ledger, the per-student
//! percentage table with a class average totals row, and the student
//! search prompt / result panel.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use tracker_core::formatting::{format_date, format_percent};
use tracker_core::models::{AttendanceRow, ClassSummary, Status, StudentSummary};

use crate::components::header::Header;
use crate::themes::Theme;

/// Outcome of the last student search, if any.
pub enum SearchState<'a> {
    /// No search in progress.
    Idle,
    /// Prompt open, collecting the query.
    Prompt(&'a str),
    /// Search resolved to a student.
    Found(&'a StudentSummary),
    /// Search found nobody with that name.
    NotFound(&'a str),
}

/// Everything the history screen needs to render one frame.
pub struct HistoryViewData<'a> {
    /// All ledger rows, in append order.
    pub rows: &'a [AttendanceRow],
    /// Class-wide summary, `None` when the ledger is empty.
    pub class: Option<&'a ClassSummary>,
    /// Number of distinct session dates in the ledger.
    pub total_days: usize,
    pub search: SearchState<'a>,
    /// Session date in display format.
    pub date: &'a str,
    /// Records file path shown in the header.
    pub records_path: &'a str,
}

/// Ledger table cells, newest session first so the visible top of the
/// table always shows recent records.
fn record_rows(rows: &[AttendanceRow]) -> Vec<(String, Status, String)> {
    rows.iter()
        .rev()
        .map(|row| (row.student_name.clone(), row.status, format_date(row.date)))
        .collect()
}

/// Per-student table cells: `(name, formatted percent)`.
fn class_rows(class: &ClassSummary) -> Vec<(String, String)> {
    class
        .students
        .iter()
        .map(|s| (s.name.clone(), format_percent(s.percent, 1)))
        .collect()
}

/// The highlighted totals row: `("CLASS AVERAGE", formatted average)`.
fn average_row(class: &ClassSummary) -> (String, String) {
    (
        "CLASS AVERAGE".to_string(),
        format_percent(class.overall_average, 2),
    )
}

/// Lines shown when the ledger has no records yet.
fn no_records_lines(theme: &Theme) -> Vec<Line<'_>> {
    vec![
        Line::from(Span::styled("No attendance records found.", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Save a session from the entry form to start the history.",
            theme.dim,
        )),
    ]
}

/// Lines for the search prompt / result panel below the tables.
fn search_lines<'a>(search: &SearchState<'a>, theme: &'a Theme) -> Vec<Line<'a>> {
    match search {
        SearchState::Idle => vec![],
        SearchState::Prompt(query) => vec![
            Line::from(vec![
                Span::styled("Search student: ", theme.label),
                Span::styled(format!("{query}_"), theme.input_active),
            ]),
            Line::from(Span::styled("Enter to search · Esc to cancel", theme.dim)),
        ],
        SearchState::Found(summary) => vec![
            Line::from(Span::styled(
                format!("Attendance record for {}", summary.name),
                theme.bold,
            )),
            Line::from(vec![
                Span::styled("  Days tracked: ", theme.label),
                Span::styled(summary.total_days.to_string(), theme.value),
            ]),
            Line::from(vec![
                Span::styled("  Present: ", theme.label),
                Span::styled(summary.present_days.to_string(), theme.success),
                Span::styled("   Absent: ", theme.label),
                Span::styled(summary.absent_days.to_string(), theme.error),
            ]),
            Line::from(vec![
                Span::styled("  Attendance: ", theme.label),
                Span::styled(format!("{}%", summary.percent), theme.value),
            ]),
        ],
        SearchState::NotFound(name) => vec![Line::from(Span::styled(
            format!("No attendance records found for '{name}'."),
            theme.warning,
        ))],
    }
}

fn records_table<'a>(rows: &[AttendanceRow], theme: &'a Theme) -> Table<'a> {
    let table_rows: Vec<Row> = record_rows(rows)
        .into_iter()
        .enumerate()
        .map(|(i, (name, status, date))| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(status.as_str()).style(theme.status_style(status)),
                Cell::from(date),
            ])
            .style(style)
        })
        .collect();

    Table::new(
        table_rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(Row::new(vec!["Student Name", "Status", "Date"]).style(theme.table_header))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(" Records "),
    )
}

fn class_table<'a>(class: &ClassSummary, theme: &'a Theme) -> Table<'a> {
    let mut rows: Vec<Row> = class_rows(class)
        .into_iter()
        .enumerate()
        .map(|(i, (name, percent))| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![Cell::from(name), Cell::from(percent)]).style(style)
        })
        .collect();

    let (avg_label, avg_value) = average_row(class);
    rows.push(
        Row::new(vec![Cell::from(avg_label), Cell::from(avg_value)]).style(theme.table_total),
    );

    Table::new(
        rows,
        [Constraint::Percentage(70), Constraint::Percentage(30)],
    )
    .header(Row::new(vec!["Student", "Attendance"]).style(theme.table_header))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(" Class Summary "),
    )
}

/// Render the history screen into `area`.
pub fn render_history(frame: &mut Frame, area: Rect, data: &HistoryViewData, theme: &Theme) {
    let mut intro = Header::new(data.date, data.records_path, theme).to_lines();
    intro.push(Line::from(Span::styled("ATTENDANCE HISTORY", theme.bold)));
    intro.push(Line::from(""));

    let class = match data.class {
        Some(class) => class,
        None => {
            intro.extend(no_records_lines(theme));
            intro.push(Line::from(""));
            intro.push(Line::from(Span::styled(
                "/ search student · b back to form · Esc quit",
                theme.dim,
            )));
            frame.render_widget(Paragraph::new(intro).style(theme.text), area);
            return;
        }
    };

    let mut footer = vec![Line::from(vec![
        Span::styled("Total records available: ", theme.label),
        Span::styled(format!("{} day(s)", data.total_days), theme.value),
    ])];
    footer.push(Line::from(""));
    footer.extend(search_lines(&data.search, theme));
    footer.push(Line::from(""));
    footer.push(Line::from(Span::styled(
        "/ search student · b back to form · Esc quit",
        theme.dim,
    )));

    let [intro_area, tables_area, footer_area] = Layout::vertical([
        Constraint::Length(intro.len() as u16),
        Constraint::Min(6),
        Constraint::Length(footer.len() as u16),
    ])
    .areas(area);

    let [records_area, class_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(tables_area);

    frame.render_widget(Paragraph::new(intro).style(theme.text), intro_area);
    frame.render_widget(records_table(data.rows, theme), records_area);
    frame.render_widget(class_table(class, theme), class_area);
    frame.render_widget(Paragraph::new(footer).style(theme.text), footer_area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
