//! Main application state and TUI event loop for the attendance tracker.
//!
//! [`App`] owns the theme, the active screen, the in-progress session
//! entries, and the CSV store backing the ledger.  It drives a single
//! synchronous event loop for all screens.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::{debug, error, info};

use tracker_core::formatting::format_date;
use tracker_core::models::{ClassSummary, SessionEntry, SessionSummary, Status, StudentSummary};
use tracker_core::session::{summarize_session, validate_session};
use tracker_data::ledger::AttendanceLedger;
use tracker_data::store::{write_export, CsvStore};

use crate::form_view::{self, FormViewData};
use crate::history_view::{self, HistoryViewData, SearchState};
use crate::report_view::{self, ReportViewData};
use crate::themes::Theme;

// ── Screen ────────────────────────────────────────────────────────────────────

/// Which screen the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Session entry form.
    Form,
    /// Report for the session that was just saved.
    Report,
    /// Attendance history with the class summary table.
    History,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the attendance tracker TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Store backing the attendance ledger.
    pub store: CsvStore,
    /// Directory session CSV exports are written to.
    pub export_dir: PathBuf,
    /// Date the current session is recorded under.
    pub date: NaiveDate,
    /// Current screen.
    pub screen: Screen,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,

    // ── Form state ──────────────────────────────────────────────────────────
    /// One slot per configured student.
    pub entries: Vec<SessionEntry>,
    /// Index of the focused slot.
    pub focused: usize,
    /// `true` when focus is on the status selector instead of the name.
    pub status_column: bool,
    /// Validation banner shown on the form.
    pub warning: Option<String>,
    /// Informational banner (e.g. save confirmation).
    pub info: Option<String>,

    // ── Report state ────────────────────────────────────────────────────────
    /// Summary of the last saved session, `None` until the first save.
    pub report: Option<SessionSummary>,
    /// Entries of the last saved session, kept for CSV export.
    last_session: Vec<SessionEntry>,
    /// Export confirmation shown on the report screen.
    pub export_note: Option<String>,

    // ── History state ───────────────────────────────────────────────────────
    /// Ledger loaded when the history screen was opened.
    ledger: Option<AttendanceLedger>,
    /// Class summary computed from the loaded ledger.
    class: Option<ClassSummary>,
    /// Number of distinct session dates in the loaded ledger.
    total_days: usize,
    /// Search query being typed, `Some` while the prompt is open.
    search_input: Option<String>,
    /// Result of the last completed search.
    search_found: Option<StudentSummary>,
    /// Name the last search failed to find.
    search_missing: Option<String>,
}

impl App {
    /// Construct a new application with `student_count` empty form slots.
    pub fn new(
        theme_name: &str,
        store: CsvStore,
        export_dir: PathBuf,
        date: NaiveDate,
        student_count: usize,
        screen: Screen,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            store,
            export_dir,
            date,
            screen,
            should_quit: false,
            entries: blank_entries(student_count),
            focused: 0,
            status_column: false,
            warning: None,
            info: None,
            report: None,
            last_session: Vec::new(),
            export_note: None,
            ledger: None,
            class: None,
            total_days: 0,
            search_input: None,
            search_found: None,
            search_missing: None,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the TUI until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop keeps
    /// redrawing banners without busy-waiting.
    pub fn run(mut self) -> io::Result<()> {
        if self.screen == Screen::History {
            self.open_history();
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Dispatch a key event to the active screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Report => self.handle_report_key(key),
            Screen::History => self.handle_history_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(2) => self.open_history(),
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.generate_report();
            }
            KeyCode::Up => {
                self.focused = self.focused.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focused + 1 < self.entries.len() {
                    self.focused += 1;
                }
            }
            KeyCode::Tab => self.status_column = !self.status_column,
            KeyCode::Enter => {
                // Enter advances like Down, wrapping to the first slot.
                self.focused = (self.focused + 1) % self.entries.len().max(1);
            }
            KeyCode::Char(' ') | KeyCode::Right if self.status_column => {
                let entry = &mut self.entries[self.focused];
                entry.status = entry.status.next();
            }
            KeyCode::Left if self.status_column => {
                let entry = &mut self.entries[self.focused];
                entry.status = entry.status.prev();
            }
            KeyCode::Char(c) if !self.status_column => {
                self.entries[self.focused].name.push(c);
                self.clear_banners();
            }
            KeyCode::Backspace if !self.status_column => {
                self.entries[self.focused].name.pop();
                self.clear_banners();
            }
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('b') => {
                self.export_note = None;
                self.screen = Screen::Form;
            }
            KeyCode::Char('e') => self.export_report(),
            KeyCode::F(2) => self.open_history(),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        // The search prompt captures all input while open.
        if self.search_input.is_some() {
            match key.code {
                KeyCode::Esc => self.search_input = None,
                KeyCode::Enter => self.run_search(),
                KeyCode::Backspace => {
                    if let Some(query) = self.search_input.as_mut() {
                        query.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(query) = self.search_input.as_mut() {
                        query.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('b') => self.screen = Screen::Form,
            KeyCode::Char('/') => {
                self.search_found = None;
                self.search_missing = None;
                self.search_input = Some(String::new());
            }
            _ => {}
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Validate the form, summarize the session, and append it to the ledger.
    ///
    /// On success the form is cleared and the report screen opens; failures
    /// surface as the warning banner and leave the form untouched.
    pub fn generate_report(&mut self) {
        self.clear_banners();

        if let Err(err) = validate_session(&self.entries) {
            self.warning = Some(err.to_string());
            return;
        }

        let summary = match summarize_session(&self.entries) {
            Ok(summary) => summary,
            Err(err) => {
                self.warning = Some(err.to_string());
                return;
            }
        };

        let mut ledger = match self.store.load() {
            Ok(ledger) => ledger,
            Err(err) => {
                error!("failed to load attendance records: {err}");
                self.warning = Some(err.to_string());
                return;
            }
        };
        ledger.append_session(&self.entries, self.date);

        if let Err(err) = self.store.save(&ledger) {
            error!("failed to save attendance records: {err}");
            self.warning = Some(err.to_string());
            return;
        }

        info!(
            date = %self.date,
            students = summary.total_students,
            present = summary.present_count,
            "session saved"
        );

        let student_count = self.entries.len();
        let saved_entries = std::mem::replace(&mut self.entries, blank_entries(student_count));
        self.last_session = saved_entries;
        self.focused = 0;
        self.status_column = false;

        self.info = Some(format!(
            "Attendance saved for {}!",
            format_date(self.date)
        ));
        self.report = Some(summary);
        self.export_note = None;
        self.screen = Screen::Report;
    }

    /// Export the last saved session to a standalone CSV file.
    fn export_report(&mut self) {
        match write_export(&self.export_dir, &self.last_session, self.date) {
            Ok(path) => {
                info!(path = %path.display(), "session exported");
                self.export_note = Some(format!("Session exported to {}", path.display()));
            }
            Err(err) => {
                error!("failed to export session: {err}");
                self.export_note = Some(format!("Export failed: {err}"));
            }
        }
    }

    /// Load the ledger and open the history screen.
    fn open_history(&mut self) {
        match self.store.load() {
            Ok(ledger) => {
                debug!(rows = ledger.len(), "records loaded for history view");
                self.class = ledger.class_summary().ok();
                self.total_days = ledger.distinct_dates();
                self.ledger = Some(ledger);
            }
            Err(err) => {
                error!("failed to load attendance records: {err}");
                self.warning = Some(err.to_string());
                self.class = None;
                self.total_days = 0;
                self.ledger = None;
            }
        }
        self.search_input = None;
        self.search_found = None;
        self.search_missing = None;
        self.screen = Screen::History;
    }

    /// Resolve the typed search query against the loaded ledger.
    fn run_search(&mut self) {
        let query = match self.search_input.take() {
            Some(query) => query,
            None => return,
        };
        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            return;
        }

        let result = self
            .ledger
            .as_ref()
            .map(|ledger| ledger.query_student(&trimmed));

        match result {
            Some(Ok(summary)) => {
                self.search_found = Some(summary);
                self.search_missing = None;
            }
            _ => {
                self.search_found = None;
                self.search_missing = Some(trimmed);
            }
        }
    }

    fn clear_banners(&mut self) {
        self.warning = None;
        self.info = None;
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let date = format_date(self.date);
        let records_path = self.store.path().display().to_string();

        match self.screen {
            Screen::Form => {
                let data = FormViewData {
                    entries: &self.entries,
                    focused: self.focused,
                    status_column: self.status_column,
                    date: &date,
                    records_path: &records_path,
                    warning: self.warning.as_deref(),
                    info: self.info.as_deref(),
                };
                form_view::render_form(frame, area, &data, &self.theme);
            }
            Screen::Report => {
                if let Some(summary) = &self.report {
                    let data = ReportViewData {
                        summary,
                        entries: &self.last_session,
                        date: &date,
                        records_path: &records_path,
                        info: self.info.as_deref(),
                        export_note: self.export_note.as_deref(),
                    };
                    report_view::render_report(frame, area, &data, &self.theme);
                }
            }
            Screen::History => {
                let search = if let Some(query) = &self.search_input {
                    SearchState::Prompt(query)
                } else if let Some(summary) = &self.search_found {
                    SearchState::Found(summary)
                } else if let Some(name) = &self.search_missing {
                    SearchState::NotFound(name)
                } else {
                    SearchState::Idle
                };
                let data = HistoryViewData {
                    rows: self.ledger.as_ref().map(|l| l.rows()).unwrap_or(&[]),
                    class: self.class.as_ref(),
                    total_days: self.total_days,
                    search,
                    date: &date,
                    records_path: &records_path,
                };
                history_view::render_history(frame, area, &data, &self.theme);
            }
        }
    }
}

/// Fresh form slots: empty names, every status unmarked.
fn blank_entries(count: usize) -> Vec<SessionEntry> {
    (0..count)
        .map(|_| SessionEntry::new("", Status::Unmarked))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn make_app(dir: &TempDir, students: usize) -> App {
        let store = CsvStore::new(dir.path().join("records.csv"));
        App::new(
            "dark",
            store,
            dir.path().to_path_buf(),
            test_date(),
            students,
            Screen::Form,
        )
    }

    #[test]
    fn test_app_starts_with_blank_form() {
        let dir = TempDir::new().unwrap();
        let app = make_app(&dir, 3);

        assert_eq!(app.screen, Screen::Form);
        assert_eq!(app.entries.len(), 3);
        assert!(app.entries.iter().all(|e| e.name.is_empty()));
        assert!(app
            .entries
            .iter()
            .all(|e| e.status == Status::Unmarked));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_typing_fills_focused_name() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 2);

        for c in "Ana".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.entries[0].name, "Ana");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.entries[0].name, "An");
    }

    #[test]
    fn test_arrow_keys_move_focus_within_bounds() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 2);

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.focused, 0, "Up at the top stays put");
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.focused, 1);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.focused, 1, "Down at the bottom stays put");
    }

    #[test]
    fn test_status_cycling_in_status_column() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);

        app.handle_key(key(KeyCode::Tab));
        assert!(app.status_column);

        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.entries[0].status, Status::Present);
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.entries[0].status, Status::Absent);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.entries[0].status, Status::Present);
    }

    #[test]
    fn test_typing_is_ignored_in_status_column() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.entries[0].name, "");
    }

    #[test]
    fn test_generate_with_missing_names_sets_warning() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 2);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);

        app.handle_key(ctrl('g'));

        assert_eq!(app.screen, Screen::Form, "validation failure stays on form");
        let warning = app.warning.as_deref().unwrap();
        assert!(warning.contains("Please enter names for students: 2"));
    }

    #[test]
    fn test_generate_saves_session_and_opens_report() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 2);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);
        app.entries[1] = SessionEntry::new("Ben", Status::Absent);

        app.generate_report();

        assert_eq!(app.screen, Screen::Report);
        let report = app.report.as_ref().unwrap();
        assert_eq!(report.total_students, 2);
        assert_eq!(report.present_count, 1);
        assert_eq!(report.attendance_percent, 50);
        assert_eq!(
            app.info.as_deref(),
            Some("Attendance saved for 15-01-2025!")
        );

        // Records land in the store.
        let ledger = app.store.load().unwrap();
        assert_eq!(ledger.len(), 2);

        // And the form is reset for the next session.
        assert!(app.entries.iter().all(|e| e.name.is_empty()));
    }

    #[test]
    fn test_export_from_report_writes_session_file() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);
        app.generate_report();

        app.handle_key(key(KeyCode::Char('e')));

        let note = app.export_note.as_deref().unwrap();
        assert!(note.contains("attendance_15-01-2025.csv"), "got: {note}");
        let exported = dir.path().join("attendance_15-01-2025.csv");
        let content = std::fs::read_to_string(exported).unwrap();
        assert!(content.contains("Alice"));
    }

    #[test]
    fn test_history_loads_class_summary() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 2);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);
        app.entries[1] = SessionEntry::new("Ben", Status::Absent);
        app.generate_report();

        app.handle_key(key(KeyCode::F(2)));

        assert_eq!(app.screen, Screen::History);
        let class = app.class.as_ref().unwrap();
        assert_eq!(class.students.len(), 2);
        assert_eq!(app.total_days, 1);
    }

    #[test]
    fn test_history_on_empty_ledger_has_no_class_summary() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);

        app.handle_key(key(KeyCode::F(2)));

        assert_eq!(app.screen, Screen::History);
        assert!(app.class.is_none());
        assert_eq!(app.total_days, 0);
    }

    #[test]
    fn test_search_finds_student_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);
        app.generate_report();
        app.handle_key(key(KeyCode::F(2)));

        app.handle_key(key(KeyCode::Char('/')));
        for c in "alice".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        let found = app.search_found.as_ref().unwrap();
        assert_eq!(found.name, "Alice");
        assert_eq!(found.percent, 100);
    }

    #[test]
    fn test_search_unknown_student_reports_missing() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);
        app.generate_report();
        app.handle_key(key(KeyCode::F(2)));

        app.handle_key(key(KeyCode::Char('/')));
        for c in "Zed".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert!(app.search_found.is_none());
        assert_eq!(app.search_missing.as_deref(), Some("Zed"));
    }

    #[test]
    fn test_slash_is_typed_into_search_not_reopened() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);
        app.handle_key(key(KeyCode::F(2)));

        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.search_input.as_deref(), Some("a/"));
    }

    #[test]
    fn test_ctrl_c_quits_from_any_screen() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_b_returns_from_report_to_form() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir, 1);
        app.entries[0] = SessionEntry::new("Alice", Status::Present);
        app.generate_report();
        assert_eq!(app.screen, Screen::Report);

        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.screen, Screen::Form);
    }
}
