use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::calendar::Month;

/// Format of the time-bound query parameters.
pub const BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One system's reporting window and the file it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    name: String,
    path: PathBuf,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Report {
    /// Window covering `month`, written to `<dir>/<name>-<YYYY>-<MM>.csv`.
    pub fn new(name: &str, dir: &Path, month: Month) -> Self {
        Self {
            name: name.to_string(),
            path: dir.join(format!("{}-{}.csv", name, month)),
            start: month.first_instant(),
            end: month.last_instant(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether the target file is present. Any stat error, not only `NotFound`, reads as absent,
    /// so an unreadable parent directory does not block generation.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.path).is_ok()
    }

    /// Query parameters `[start, end]`.
    pub fn bounds(&self) -> [String; 2] {
        [
            self.start.format(BOUND_FORMAT).to_string(),
            self.end.format(BOUND_FORMAT).to_string(),
        ]
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
