use std::fs::{self, File};
use std::io::{self, Write};

use crate::db::Connection;
use crate::error::ReportError;
use crate::extract::{csv_writer, extract};
use crate::logs::Logs;
use crate::report::Report;

/// Terminal state of one report's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was already there and was left untouched.
    Skipped,
    Generated,
    CreateFailed,
    /// Query or extraction failed. The partial file was removed, or a removal warning logged.
    GenerateFailed,
    CloseFailed,
}

/// Runs the report query over one connection and writes the results.
pub struct Reporter<C> {
    conn: C,
    query: String,
    width: usize,
    /// Final step on a fully written file.
    close: fn(&File) -> io::Result<()>,
}

impl<C: Connection> Reporter<C> {
    pub fn new(conn: C, query: &str, width: usize) -> Self {
        Self {
            conn,
            query: query.to_string(),
            width,
            close: File::sync_all,
        }
    }

    /// Queries `report`'s window and streams the rows into `sink`. Returns the row count.
    pub fn write<W: Write>(&mut self, sink: W, report: &Report) -> Result<u64, ReportError> {
        let width = self.width;
        let mut writer = csv_writer(sink);
        let mut written = 0;
        self.conn.query(&self.query, &report.bounds(), &mut |rows| {
            written = extract(&mut writer, rows, width)?;
            Ok(())
        })?;
        Ok(written)
    }

    /// Generates `report`'s file unless it already exists. Failures are logged and never leave a
    /// partial file behind without a warning saying so.
    pub fn generate(&mut self, logs: &Logs, report: &Report) -> Outcome {
        logs.info(format_args!(
            "{}: generating report for {}",
            report,
            report.name()
        ));
        if report.exists() {
            logs.info(format_args!("{}: exists", report));
            return Outcome::Skipped;
        }

        let mut file = match File::create(report.path()) {
            Ok(file) => file,
            Err(e) => {
                logs.error(format_args!("{}: cannot create file: {}", report, e));
                return Outcome::CreateFailed;
            }
        };

        if let Err(e) = self.write(&mut file, report) {
            logs.error(format_args!("{}: cannot generate report: {}", report, e));
            // close error ignored, the write error stands
            drop(file);
            remove_partial(logs, report);
            return Outcome::GenerateFailed;
        }

        if let Err(e) = (self.close)(&file) {
            logs.error(format_args!("{}: cannot close file: {}", report, e));
            drop(file);
            remove_partial(logs, report);
            return Outcome::CloseFailed;
        }
        Outcome::Generated
    }
}

fn remove_partial(logs: &Logs, report: &Report) {
    if let Err(e) = fs::remove_file(report.path()) {
        logs.error(format_args!(
            "{}: cannot remove partial report file, remove it manually: {}",
            report, e
        ));
    }
}
