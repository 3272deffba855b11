use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for the `Date` column of the records file (DD-MM-YYYY).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Recorded attendance state for one student slot.
///
/// `Unmarked` is the tri-state placeholder shown before the user picks a
/// status. It still passes validation (it counts against the attendance
/// percentage but appears in neither the present nor the absent list) and
/// is persisted as the literal string `"Select"`, matching the records
/// files written by earlier versions of the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Present,
    Absent,
    #[default]
    #[serde(rename = "Select")]
    Unmarked,
}

impl Status {
    /// Parse a status string case-insensitively.
    ///
    /// Anything that is neither `"present"` nor `"absent"` (including the
    /// `"Select"` placeholder and unknown values from hand-edited files)
    /// maps to [`Status::Unmarked`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "present" => Status::Present,
            "absent" => Status::Absent,
            _ => Status::Unmarked,
        }
    }

    /// The wire / display string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
            Status::Unmarked => "Select",
        }
    }

    /// Cycle to the next status in form order: Select → Present → Absent.
    pub fn next(&self) -> Self {
        match self {
            Status::Unmarked => Status::Present,
            Status::Present => Status::Absent,
            Status::Absent => Status::Unmarked,
        }
    }

    /// Cycle to the previous status in form order.
    pub fn prev(&self) -> Self {
        match self {
            Status::Unmarked => Status::Absent,
            Status::Absent => Status::Present,
            Status::Present => Status::Unmarked,
        }
    }
}

/// One persisted attendance observation. Rows are immutable once appended
/// to the ledger; there is no update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// Student name exactly as entered (trimmed at validation time).
    pub student_name: String,
    /// Attendance state recorded for this row.
    pub status: Status,
    /// Calendar date of the session this row belongs to.
    pub date: NaiveDate,
}

/// One form slot of a session before it is appended to the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Student name as typed into the form.
    pub name: String,
    /// Tri-state status selection for this slot.
    pub status: Status,
}

impl SessionEntry {
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Three-way attendance feedback classification.
///
/// Boundaries are inclusive on the lower end of each tier: exactly 75 %
/// is `Medium`, exactly 90 % is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTier {
    /// Below 75 %.
    Low,
    /// 75 % up to (but not including) 90 %.
    Medium,
    /// 90 % and above.
    High,
}

impl FeedbackTier {
    /// Classify an attendance percentage into its feedback tier.
    pub fn from_percent(percent: u8) -> Self {
        if percent >= 90 {
            FeedbackTier::High
        } else if percent >= 75 {
            FeedbackTier::Medium
        } else {
            FeedbackTier::Low
        }
    }

    /// User-facing feedback message for this tier.
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackTier::Low => "Attendance below 75%! Students need improvement.",
            FeedbackTier::Medium => "Good, but can be improved!",
            FeedbackTier::High => "Excellent class attendance!",
        }
    }
}

/// Aggregate result of one session's report generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Number of configured student slots (the percentage denominator).
    pub total_students: usize,
    /// Entries whose status is `Present`.
    pub present_count: usize,
    /// Names of entries whose status is `Absent`, in form order.
    pub absent_names: Vec<String>,
    /// `present_count / total_students × 100`, rounded half away from zero.
    pub attendance_percent: u8,
    /// Feedback tier derived from `attendance_percent`.
    pub tier: FeedbackTier,
}

/// Per-student attendance figures across the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    /// The student's name with its first-seen casing.
    pub name: String,
    /// Number of distinct dates on which this student has a row.
    pub total_days: usize,
    /// Rows with status `Present`.
    pub present_days: usize,
    /// Rows with status `Absent`.
    pub absent_days: usize,
    /// `present_days / total_days × 100`, rounded half away from zero.
    pub percent: u8,
}

/// One student's unrounded share of the class summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentPercent {
    /// The student's name with its first-seen casing.
    pub name: String,
    /// `present rows / total rows × 100` for this student, unrounded.
    pub percent: f64,
}

/// Class-wide attendance summary over the whole ledger.
///
/// Students appear in first-seen order (the order their first row was
/// appended), so the summary mirrors the history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub students: Vec<StudentPercent>,
    /// Mean of all per-student percentages, rounded to 2 decimal places.
    pub overall_average: f64,
}
