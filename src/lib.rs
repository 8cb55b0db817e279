//! Monthly CSV extracts from relational data sources.
//!
//! For every configured system a [`task::Task`] expands into one [`report::Report`] per trailing
//! calendar month and writes each window's query results to `<dir>/<system>-<YYYY>-<MM>.csv`,
//! skipping files that already exist. [`dispatch::run`] processes systems concurrently behind a
//! bounded admission gate.

/// Calendar month arithmetic used for window boundaries.
pub mod calendar;
/// JSON run configuration.
pub mod config;
/// Database driver seam and the SQLite driver.
pub mod db;
/// Concurrent execution of all systems' tasks.
pub mod dispatch;
/// Errors surfaced by queries, row scanning and output writes.
pub mod error;
/// CSV dialect and row extraction.
pub mod extract;
/// Explicit error/info logging sinks.
pub mod logs;
/// One reporting window and its output file.
pub mod report;
/// Query execution and the per-report skip/create/cleanup sequence.
pub mod reporter;
/// Per-system expansion into monthly reports.
pub mod task;

pub use config::Conf;
pub use dispatch::{run, Summary};
pub use error::ReportError;
pub use logs::Logs;
