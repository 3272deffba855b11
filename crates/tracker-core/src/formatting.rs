use chrono::NaiveDate;

use crate::error::{Result, TrackerError};
use crate::models::DATE_FORMAT;

/// Format a percentage with a fixed number of decimal places and a
/// trailing `%` sign.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::format_percent;
///
/// assert_eq!(format_percent(50.0, 2), "50.00%");
/// assert_eq!(format_percent(66.666666, 2), "66.67%");
/// assert_eq!(format_percent(100.0, 0), "100%");
/// ```
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.prec$}%", value, prec = decimals)
}

/// Round a real-valued percentage to two decimal places.
///
/// Used for the class-wide overall average, which is reported to exactly
/// two decimals while per-student percentages stay unrounded.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::round_two_decimals;
///
/// assert_eq!(round_two_decimals(66.66666), 66.67);
/// assert_eq!(round_two_decimals(50.0), 50.0);
/// ```
pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a date in the DD-MM-YYYY wire format used by the records file.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tracker_core::formatting::format_date;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
/// assert_eq!(format_date(date), "02-01-2025");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a DD-MM-YYYY date string.
///
/// Fails with [`TrackerError::InvalidDate`] carrying the offending input.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(s.to_string()))
}
