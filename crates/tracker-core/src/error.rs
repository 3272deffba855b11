use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the attendance tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// One or more form slots were submitted without a student name.
    /// Carries every offending slot index (1-based) so the whole list
    /// can be reported in a single message.
    #[error("Please enter names for students: {}", join_indices(indices))]
    MissingNames { indices: Vec<usize> },

    /// A student search matched no row in the ledger.
    #[error("No attendance records found for student: {0}")]
    StudentNotFound(String),

    /// A session summary was requested over zero entries.
    #[error("Cannot summarize a session with no students")]
    EmptySession,

    /// A ledger-wide summary was requested but no rows exist yet.
    #[error("No attendance records recorded yet")]
    EmptyLedger,

    /// A date string did not match the DD-MM-YYYY wire format.
    #[error("Invalid date: {0} (expected DD-MM-YYYY)")]
    InvalidDate(String),

    /// The records file could not be opened or read from disk.
    #[error("Failed to read records file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The records file exists but could not be parsed as CSV.
    #[error("Failed to parse attendance records: {0}")]
    Csv(#[from] csv::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Join 1-based slot indices into the comma-separated list shown to the
/// user, e.g. `[1, 3, 7]` → `"1, 3, 7"`.
fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
