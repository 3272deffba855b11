//! The append-only attendance ledger and its summary queries.
//!
//! The ledger is an ordered sequence of [`AttendanceRow`]s across all
//! recorded sessions. Rows are never updated or deleted; a session append
//! concatenates new rows after the existing ones. Repeated submissions for
//! the same student and date are kept as duplicate rows on purpose — every
//! row is one observation.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use tracker_core::error::{Result, TrackerError};
use tracker_core::models::{
    AttendanceRow, ClassSummary, SessionEntry, Status, StudentPercent, StudentSummary,
};
use tracker_core::session::percent_of;

/// In-memory view of the whole records table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceLedger {
    rows: Vec<AttendanceRow>,
}

impl AttendanceLedger {
    /// An empty ledger (no backing file yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from already-parsed rows, preserving their order.
    pub fn from_rows(rows: Vec<AttendanceRow>) -> Self {
        Self { rows }
    }

    /// All rows in append order.
    pub fn rows(&self) -> &[AttendanceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one row per session entry, dated `date`.
    ///
    /// Existing rows are untouched and new rows keep form order. Names are
    /// trimmed as they are recorded. No deduplication happens here: saving
    /// the same session twice doubles its rows.
    pub fn append_session(&mut self, entries: &[SessionEntry], date: NaiveDate) {
        self.rows.extend(entries.iter().map(|entry| AttendanceRow {
            student_name: entry.name.trim().to_string(),
            status: entry.status,
            date,
        }));
    }

    /// Number of distinct session dates across all rows.
    pub fn distinct_dates(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.date)
            .collect::<HashSet<NaiveDate>>()
            .len()
    }

    /// Look up one student's attendance figures by case-insensitive exact
    /// name match.
    ///
    /// `total_days` counts distinct dates (a duplicate row on the same day
    /// adds an observation but not a day), while present/absent figures
    /// count rows. Fails with [`TrackerError::StudentNotFound`] when no row
    /// matches.
    pub fn query_student(&self, name: &str) -> Result<StudentSummary> {
        let needle = name.trim().to_lowercase();

        let matches: Vec<&AttendanceRow> = self
            .rows
            .iter()
            .filter(|row| row.student_name.to_lowercase() == needle)
            .collect();

        if matches.is_empty() {
            return Err(TrackerError::StudentNotFound(name.trim().to_string()));
        }

        let total_days = matches
            .iter()
            .map(|row| row.date)
            .collect::<HashSet<NaiveDate>>()
            .len();
        let present_days = matches
            .iter()
            .filter(|row| row.status == Status::Present)
            .count();
        let absent_days = matches
            .iter()
            .filter(|row| row.status == Status::Absent)
            .count();

        Ok(StudentSummary {
            name: matches[0].student_name.clone(),
            total_days,
            present_days,
            absent_days,
            percent: percent_of(present_days, total_days),
        })
    }

    /// Per-student attendance percentages plus the class-wide average.
    ///
    /// Rows are grouped by case-insensitive name; groups appear in
    /// first-seen order with the first-seen casing, so the summary reads in
    /// the same order the history table does. Per-student percentages stay
    /// unrounded; only the overall average (their mean) is rounded, to two
    /// decimal places. Fails with [`TrackerError::EmptyLedger`] on an empty
    /// ledger.
    pub fn class_summary(&self) -> Result<ClassSummary> {
        if self.rows.is_empty() {
            return Err(TrackerError::EmptyLedger);
        }

        // (display name, present rows, total rows), in first-seen order.
        let mut groups: Vec<(String, usize, usize)> = Vec::new();
        let mut index_by_key: HashMap<String, usize> = HashMap::new();

        for row in &self.rows {
            let key = row.student_name.to_lowercase();
            let idx = *index_by_key.entry(key).or_insert_with(|| {
                groups.push((row.student_name.clone(), 0, 0));
                groups.len() - 1
            });
            groups[idx].2 += 1;
            if row.status == Status::Present {
                groups[idx].1 += 1;
            }
        }

        let students: Vec<StudentPercent> = groups
            .into_iter()
            .map(|(name, present, total)| StudentPercent {
                name,
                percent: (present as f64 / total as f64) * 100.0,
            })
            .collect();

        let overall_average = tracker_core::formatting::round_two_decimals(
            students.iter().map(|s| s.percent).sum::<f64>() / students.len() as f64,
        );

        Ok(ClassSummary {
            students,
            overall_average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(name: &str, status: Status) -> SessionEntry {
        SessionEntry::new(name, status)
    }

    // ── append_session ─────────────────────────────────────────────────────

    #[test]
    fn test_append_session_concatenates_in_order() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(
            &[entry("Alice", Status::Present), entry("Bob", Status::Absent)],
            date(1, 1, 2025),
        );
        ledger.append_session(&[entry("Cara", Status::Present)], date(2, 1, 2025));

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.rows()[0].student_name, "Alice");
        assert_eq!(ledger.rows()[1].student_name, "Bob");
        assert_eq!(ledger.rows()[2].student_name, "Cara");
        assert_eq!(ledger.rows()[2].date, date(2, 1, 2025));
    }

    #[test]
    fn test_append_session_trims_names() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("  Alice  ", Status::Present)], date(1, 1, 2025));
        assert_eq!(ledger.rows()[0].student_name, "Alice");
    }

    #[test]
    fn test_append_session_never_deduplicates() {
        // Re-saving the same student/date pair is accepted and produces a
        // duplicate row.
        let mut ledger = AttendanceLedger::new();
        let entries = [entry("Alice", Status::Present)];
        ledger.append_session(&entries, date(1, 1, 2025));
        ledger.append_session(&entries, date(1, 1, 2025));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.rows()[0], ledger.rows()[1]);
    }

    #[test]
    fn test_append_session_keeps_existing_rows_unchanged() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));
        let before = ledger.rows()[0].clone();

        ledger.append_session(&[entry("Bob", Status::Absent)], date(2, 1, 2025));
        assert_eq!(ledger.rows()[0], before);
    }

    // ── distinct_dates ─────────────────────────────────────────────────────

    #[test]
    fn test_distinct_dates_counts_days_not_rows() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(
            &[entry("Alice", Status::Present), entry("Bob", Status::Absent)],
            date(1, 1, 2025),
        );
        ledger.append_session(&[entry("Alice", Status::Present)], date(2, 1, 2025));
        assert_eq!(ledger.distinct_dates(), 2);
    }

    // ── query_student ──────────────────────────────────────────────────────

    #[test]
    fn test_query_student_two_day_history() {
        // Alice present on 01-01-2025, absent on 02-01-2025.
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));
        ledger.append_session(&[entry("Alice", Status::Absent)], date(2, 1, 2025));

        let summary = ledger.query_student("Alice").unwrap();
        assert_eq!(summary.total_days, 2);
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.percent, 50);
    }

    #[test]
    fn test_query_student_case_insensitive_exact_match() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));

        let summary = ledger.query_student("aLiCe").unwrap();
        // Display name keeps the stored casing.
        assert_eq!(summary.name, "Alice");
    }

    #[test]
    fn test_query_student_no_partial_match() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));

        let err = ledger.query_student("Ali").unwrap_err();
        assert!(matches!(err, TrackerError::StudentNotFound(_)));
    }

    #[test]
    fn test_query_student_not_found_carries_name() {
        let ledger = AttendanceLedger::new();
        match ledger.query_student("  Zoe ") {
            Err(TrackerError::StudentNotFound(name)) => assert_eq!(name, "Zoe"),
            other => panic!("expected StudentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_query_student_duplicate_day_counts_one_day_two_observations() {
        let mut ledger = AttendanceLedger::new();
        let d = date(1, 1, 2025);
        ledger.append_session(&[entry("Alice", Status::Present)], d);
        ledger.append_session(&[entry("Alice", Status::Present)], d);

        let summary = ledger.query_student("Alice").unwrap();
        assert_eq!(summary.total_days, 1);
        assert_eq!(summary.present_days, 2);
    }

    // ── class_summary ──────────────────────────────────────────────────────

    #[test]
    fn test_class_summary_single_student_two_rows() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));
        ledger.append_session(&[entry("Alice", Status::Absent)], date(2, 1, 2025));

        let summary = ledger.class_summary().unwrap();
        assert_eq!(summary.students.len(), 1);
        assert_eq!(summary.students[0].name, "Alice");
        assert_eq!(summary.students[0].percent, 50.0);
        assert_eq!(summary.overall_average, 50.00);
    }

    #[test]
    fn test_class_summary_first_seen_order() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(
            &[
                entry("Zoe", Status::Present),
                entry("Alice", Status::Absent),
                entry("Milo", Status::Present),
            ],
            date(1, 1, 2025),
        );
        // A later session must not reorder the groups.
        ledger.append_session(&[entry("alice", Status::Present)], date(2, 1, 2025));

        let summary = ledger.class_summary().unwrap();
        let names: Vec<&str> = summary.students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Alice", "Milo"]);
    }

    #[test]
    fn test_class_summary_groups_case_insensitively() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));
        ledger.append_session(&[entry("ALICE", Status::Absent)], date(2, 1, 2025));

        let summary = ledger.class_summary().unwrap();
        assert_eq!(summary.students.len(), 1);
        // First-seen casing wins.
        assert_eq!(summary.students[0].name, "Alice");
        assert_eq!(summary.students[0].percent, 50.0);
    }

    #[test]
    fn test_class_summary_unmarked_rows_lower_the_share() {
        let mut ledger = AttendanceLedger::new();
        ledger.append_session(&[entry("Alice", Status::Present)], date(1, 1, 2025));
        ledger.append_session(&[entry("Alice", Status::Unmarked)], date(2, 1, 2025));

        let summary = ledger.class_summary().unwrap();
        // 1 present of 2 rows: placeholder rows stay in the denominator.
        assert_eq!(summary.students[0].percent, 50.0);
    }

    #[test]
    fn test_class_summary_overall_average_two_decimals() {
        let mut ledger = AttendanceLedger::new();
        // Alice 2/3 present (66.66…), Bob 1/1 present (100).
        ledger.append_session(
            &[entry("Alice", Status::Present), entry("Bob", Status::Present)],
            date(1, 1, 2025),
        );
        ledger.append_session(&[entry("Alice", Status::Present)], date(2, 1, 2025));
        ledger.append_session(&[entry("Alice", Status::Absent)], date(3, 1, 2025));

        let summary = ledger.class_summary().unwrap();
        // Mean of 66.666… and 100 = 83.333… → 83.33.
        assert_eq!(summary.overall_average, 83.33);
    }

    #[test]
    fn test_class_summary_empty_ledger_is_an_error() {
        let ledger = AttendanceLedger::new();
        assert!(matches!(
            ledger.class_summary(),
            Err(TrackerError::EmptyLedger)
        ));
    }

    #[test]
    fn test_query_empty_ledger_reports_not_found() {
        // Searching an empty ledger is a not-found, not an empty-ledger
        // failure: the user sees the same informational message either way.
        let ledger = AttendanceLedger::new();
        assert!(matches!(
            ledger.query_student("Alice"),
            Err(TrackerError::StudentNotFound(_))
        ));
    }
}
