//! Data layer for the attendance tracker.
//!
//! Owns the append-only [`ledger::AttendanceLedger`] and the CSV-backed
//! [`store::CsvStore`] that loads and rewrites it, plus the per-session
//! export writer.

pub mod ledger;
pub mod store;

pub use tracker_core as core;
