//! Version snapshot naming.
//!
//! Snapshots are named after the second they were taken, in a fixed-width
//! format so that lexicographic order is chronological order.

use chrono::{DateTime, Utc};

/// `chrono` format of a snapshot timestamp, e.g. `2026-10-16_09-41-07`.
pub const VERSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Render `at` as a snapshot timestamp (second resolution).
pub fn version_timestamp(at: DateTime<Utc>) -> String {
    at.format(VERSION_TIMESTAMP_FORMAT).to_string()
}

/// File name of a snapshot taken at `at` for a document with extension `ext`.
pub fn snapshot_name(at: DateTime<Utc>, ext: &str) -> String {
    format!("{}{ext}", version_timestamp(at))
}
