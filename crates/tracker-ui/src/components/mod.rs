//! Reusable rendering components shared by the tracker's views.

pub mod chart;
pub mod header;
