//! Core domain layer for the attendance tracker.
//!
//! Holds the attendance data model, session validation and summary
//! calculations, the shared error type, CLI settings, and display
//! formatting helpers. This crate performs no I/O beyond the persisted
//! last-used settings file.

pub mod error;
pub mod formatting;
pub mod models;
pub mod session;
pub mod settings;
