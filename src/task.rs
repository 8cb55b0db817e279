use std::iter;
use std::ops::AddAssign;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::calendar::Month;
use crate::config::Conf;
use crate::db::Connector;
use crate::error::ReportError;
use crate::logs::Logs;
use crate::report::Report;
use crate::reporter::{Outcome, Reporter};

/// Report counts for one or more tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub skipped: usize,
    pub generated: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::Generated => self.generated += 1,
            Outcome::CreateFailed | Outcome::GenerateFailed | Outcome::CloseFailed => {
                self.failed += 1
            }
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.skipped += other.skipped;
        self.generated += other.generated;
        self.failed += other.failed;
    }
}

/// All reports of one system for a single run.
#[derive(Debug, Clone)]
pub struct Task {
    now: NaiveDateTime,
    name: String,
    dir: PathBuf,
    dsn: String,
    query: String,
    months: i32,
    fields: usize,
}

impl Task {
    pub fn new(now: NaiveDateTime, name: &str, dsn: &str, conf: &Conf) -> Self {
        Self {
            now,
            name: name.to_string(),
            dir: conf.directory.clone(),
            dsn: dsn.to_string(),
            query: conf.query.clone(),
            months: conf.months,
            fields: conf.fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One report per full calendar month before the month of `now`, most recent first.
    /// A non-positive month count yields no reports.
    pub fn reports(&self) -> Vec<Report> {
        let count = usize::try_from(self.months).unwrap_or(0);
        iter::successors(Month::containing(self.now).pred(), |m| m.pred())
            .take(count)
            .map(|month| Report::new(&self.name, &self.dir, month))
            .collect()
    }

    /// Opens the system's connection and generates its reports one after another. The
    /// connection is closed when this returns. Only a failed connect is returned as an error;
    /// report failures are logged and counted.
    pub fn exec<C: Connector>(&self, connector: &C, logs: &Logs) -> Result<Tally, ReportError> {
        let conn = connector.connect(&self.dsn)?;
        let mut reporter = Reporter::new(conn, &self.query, self.fields);
        let mut tally = Tally::default();
        for report in self.reports() {
            tally.record(reporter.generate(logs, &report));
        }
        Ok(tally)
    }
}
