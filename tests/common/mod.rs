#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use log::{Level, Log, Metadata, Record};

use t3rep::db::{Connection, Connector, Rows};
use t3rep::{Logs, ReportError};

// --------- log capture ---------

#[derive(Default)]
pub struct Capture {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Capture {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.lines
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Logs backed by two capture sinks, returned as (logs, errors, infos).
pub fn capture_logs() -> (Logs, Arc<Capture>, Arc<Capture>) {
    let err = Arc::new(Capture::default());
    let info = Arc::new(Capture::default());
    let logs = Logs::new(err.clone(), info.clone());
    (logs, err, info)
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

// --------- scripted driver ---------

/// Connection that replays fixed rows, optionally failing mid-stream.
#[derive(Clone, Default)]
pub struct Scripted {
    pub rows: Vec<Vec<String>>,
    /// Fail when asked for the row at this index.
    pub fail_at: Option<usize>,
    /// Replaced by a directory right before the failure, so removing it cannot succeed.
    pub sabotage: Option<PathBuf>,
    pub delay: Duration,
    /// Parameters of every query issued.
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Scripted {
    pub fn with_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|f| f.to_string()).collect())
                .collect(),
            ..Self::default()
        }
    }
}

struct ScriptedRows<'a> {
    script: &'a Scripted,
    next: usize,
}

impl Connection for Scripted {
    fn query(
        &mut self,
        _sql: &str,
        params: &[String],
        visit: &mut dyn FnMut(&mut dyn Rows) -> Result<(), ReportError>,
    ) -> Result<(), ReportError> {
        self.calls.lock().unwrap().push(params.to_vec());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        visit(&mut ScriptedRows {
            script: self,
            next: 0,
        })
    }
}

impl Rows for ScriptedRows<'_> {
    fn scan(&mut self, buf: &mut [String]) -> Result<bool, ReportError> {
        if self.script.fail_at == Some(self.next) {
            if let Some(path) = &self.script.sabotage {
                sabotage(path);
            }
            return Err(ReportError::scan("connection reset by peer"));
        }
        let Some(row) = self.script.rows.get(self.next) else {
            return Ok(false);
        };
        if row.len() != buf.len() {
            return Err(ReportError::ColumnCount {
                expected: buf.len(),
                actual: row.len(),
            });
        }
        buf.clone_from_slice(row);
        self.next += 1;
        Ok(true)
    }
}

fn sabotage(path: &Path) {
    fs::remove_file(path).unwrap();
    fs::create_dir(path).unwrap();
}

// --------- fake connector ---------

/// Connector handing out [`Scripted`] connections while tracking how many are open at once.
#[derive(Default)]
pub struct Fake {
    pub script: Scripted,
    pub unreachable: HashSet<String>,
    pub open: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
    pub connects: AtomicUsize,
}

pub struct FakeConn {
    inner: Scripted,
    open: Arc<AtomicUsize>,
}

impl Connector for Fake {
    type Conn = FakeConn;

    fn connect(&self, dsn: &str) -> Result<FakeConn, ReportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.contains(dsn) {
            return Err(ReportError::connection(format!("{}: no route to host", dsn)));
        }
        let now = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Ok(FakeConn {
            inner: self.script.clone(),
            open: self.open.clone(),
        })
    }
}

impl Connection for FakeConn {
    fn query(
        &mut self,
        sql: &str,
        params: &[String],
        visit: &mut dyn FnMut(&mut dyn Rows) -> Result<(), ReportError>,
    ) -> Result<(), ReportError> {
        self.inner.query(sql, params, visit)
    }
}

impl Drop for FakeConn {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
