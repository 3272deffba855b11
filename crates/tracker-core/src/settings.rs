use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::formatting::parse_date;

/// Default file name of the attendance records table.
pub const RECORDS_FILE_NAME: &str = "attendance_records.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Record and review class attendance from the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "attendance-tracker",
    about = "Record and review class attendance from the terminal",
    version
)]
pub struct Settings {
    /// Number of student slots on the entry form (1-100)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=100))]
    pub students: u16,

    /// Session date in DD-MM-YYYY format (defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Path to the attendance records CSV file
    #[arg(long)]
    pub records_file: Option<PathBuf>,

    /// Startup view
    #[arg(long, default_value = "form", value_parser = ["form", "history", "search"])]
    pub view: String,

    /// Student name to look up (used with --view search)
    #[arg(long)]
    pub student: Option<String>,

    /// Directory that exported per-session CSV files are written into
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to
/// `~/.attendance-tracker/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.attendance-tracker/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".attendance-tracker").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent
    /// directories if needed.
    pub fn save(&self) -> std::result::Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit
    /// CLI value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so
    /// that tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins). The session date is never
        // loaded from last-used; it defaults to today on every run.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "students") {
            if let Some(v) = last.students {
                settings.students = v.clamp(1, 100);
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The tracker's data directory, `~/.attendance-tracker/`.
    pub fn data_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".attendance-tracker")
    }

    /// Resolve the records file location: `--records-file` when given,
    /// otherwise `~/.attendance-tracker/attendance_records.csv`.
    pub fn records_path(&self) -> PathBuf {
        self.records_file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join(RECORDS_FILE_NAME))
    }

    /// Resolve the session date: `--date` parsed as DD-MM-YYYY when given,
    /// otherwise today's local calendar date.
    pub fn session_date(&self) -> Result<NaiveDate> {
        match &self.date {
            Some(raw) => parse_date(raw),
            None => Ok(Local::now().date_naive()),
        }
    }

    /// Resolve the export directory: `--export-dir` when given, otherwise
    /// the current working directory.
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            students: Some(s.students),
            view: Some(s.view.clone()),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["attendance-tracker"]);

        assert_eq!(settings.students, 10);
        assert!(settings.date.is_none());
        assert!(settings.records_file.is_none());
        assert_eq!(settings.view, "form");
        assert!(settings.student.is_none());
        assert!(settings.export_dir.is_none());
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_students_range_enforced() {
        assert!(Settings::try_parse_from(["attendance-tracker", "--students", "0"]).is_err());
        assert!(Settings::try_parse_from(["attendance-tracker", "--students", "101"]).is_err());
        let ok = Settings::parse_from(["attendance-tracker", "--students", "100"]);
        assert_eq!(ok.students, 100);
    }

    #[test]
    fn test_settings_view_values() {
        for view in ["form", "history", "search"] {
            let s = Settings::parse_from(["attendance-tracker", "--view", view]);
            assert_eq!(s.view, view);
        }
        assert!(Settings::try_parse_from(["attendance-tracker", "--view", "pie"]).is_err());
    }

    // ── Path / date resolution ────────────────────────────────────────────────

    #[test]
    fn test_records_path_explicit_flag_wins() {
        let s = Settings::parse_from([
            "attendance-tracker",
            "--records-file",
            "/tmp/custom.csv",
        ]);
        assert_eq!(s.records_path(), PathBuf::from("/tmp/custom.csv"));
    }

    #[test]
    fn test_records_path_default_file_name() {
        let s = Settings::parse_from(["attendance-tracker"]);
        let path = s.records_path();
        assert!(path.ends_with(
            PathBuf::from(".attendance-tracker").join(RECORDS_FILE_NAME)
        ));
    }

    #[test]
    fn test_session_date_parses_wire_format() {
        let s = Settings::parse_from(["attendance-tracker", "--date", "02-01-2025"]);
        let date = s.session_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn test_session_date_rejects_iso() {
        let s = Settings::parse_from(["attendance-tracker", "--date", "2025-01-02"]);
        assert!(s.session_date().is_err());
    }

    #[test]
    fn test_session_date_defaults_to_today() {
        let s = Settings::parse_from(["attendance-tracker"]);
        assert_eq!(s.session_date().unwrap(), Local::now().date_naive());
    }

    // ── LastUsedParams persistence ────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            students: Some(25),
            view: Some("history".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.students, Some(25));
        assert_eq!(loaded.view, Some("history".to_string()));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.theme.is_none());
        assert!(loaded.students.is_none());
        assert!(loaded.view.is_none());
    }

    // ── load_with_last_used (uses config path injection) ─────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_students() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            students: Some(42),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["attendance-tracker".into()], &config_path);
        assert_eq!(settings.students, 42);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["attendance-tracker".into(), "--theme".into(), "light".into()],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");
        assert!(config_path.exists(), "file must exist before clear");

        Settings::load_with_last_used_impl(
            vec!["attendance-tracker".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["attendance-tracker".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["attendance-tracker".into(), "--students".into(), "30".into()],
            &config_path,
        );

        assert!(
            config_path.exists(),
            "config file must be persisted after run"
        );
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.students, Some(30));
    }

    #[test]
    fn test_load_with_last_used_out_of_range_persisted_clamped() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        // A hand-edited config may carry an out-of-range count.
        let params = LastUsedParams {
            students: Some(500),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["attendance-tracker".into()], &config_path);
        assert_eq!(settings.students, 100);
    }
}
