//! Terminal UI layer for the attendance tracker.
//!
//! Provides themes, the header and chart components, the session entry form,
//! report and history views, and the main application event loop built on
//! top of [`ratatui`].

pub mod app;
pub mod components;
pub mod form_view;
pub mod history_view;
pub mod report_view;
pub mod themes;

pub use tracker_core as core;
