//! Session validation and summary calculations.
//!
//! Pure functions over explicit entry lists; persistence of the resulting
//! rows is the data layer's job.

use crate::error::{Result, TrackerError};
use crate::models::{FeedbackTier, SessionEntry, SessionSummary, Status};

/// Integer percentage `count / total × 100`, rounded half away from zero.
///
/// `f64::round` already rounds ties away from zero, which keeps the
/// result deterministic across platforms (2 of 3 → 67, never 66).
pub fn percent_of(count: usize, total: usize) -> u8 {
    debug_assert!(total > 0, "percentage denominator must be positive");
    ((count as f64 / total as f64) * 100.0).round() as u8
}

/// Check that every entry carries a non-empty student name.
///
/// Collects the 1-based indices of all empty or whitespace-only names and
/// reports the full set in one [`TrackerError::MissingNames`]; the session
/// is never partially accepted. On success the input is returned unchanged
/// and in order. A placeholder status does not fail validation.
pub fn validate_session(entries: &[SessionEntry]) -> Result<&[SessionEntry]> {
    let missing: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.name.trim().is_empty())
        .map(|(i, _)| i + 1)
        .collect();

    if missing.is_empty() {
        Ok(entries)
    } else {
        Err(TrackerError::MissingNames { indices: missing })
    }
}

/// Compute the [`SessionSummary`] for a validated entry list.
///
/// Entries still carrying the placeholder status count in the denominator
/// but appear in neither the present count nor the absent list. Fails with
/// [`TrackerError::EmptySession`] on an empty list, since the percentage
/// denominator must be positive.
pub fn summarize_session(entries: &[SessionEntry]) -> Result<SessionSummary> {
    if entries.is_empty() {
        return Err(TrackerError::EmptySession);
    }

    let total_students = entries.len();
    let present_count = entries
        .iter()
        .filter(|e| e.status == Status::Present)
        .count();
    let absent_names: Vec<String> = entries
        .iter()
        .filter(|e| e.status == Status::Absent)
        .map(|e| e.name.clone())
        .collect();

    let attendance_percent = percent_of(present_count, total_students);

    Ok(SessionSummary {
        total_students,
        present_count,
        absent_names,
        attendance_percent,
        tier: FeedbackTier::from_percent(attendance_percent),
    })
}
