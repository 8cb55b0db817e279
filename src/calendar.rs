//! Calendar month arithmetic on naive local wall-clock time.
//!
//! Window boundaries are sensitive to month length, leap years and year rollover, so the
//! arithmetic here is done on a plain month index instead of on durations.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A calendar month, stored as its first day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month)
    }

    /// Month that contains `t`.
    pub fn containing(t: NaiveDateTime) -> Self {
        Month(t.date() - Duration::days(i64::from(t.day0())))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Steps `months` calendar months forward (or back when negative). `None` when the result
    /// falls outside the representable date range.
    pub fn add(self, months: i32) -> Option<Self> {
        let index = i64::from(self.year()) * 12 + i64::from(self.month0()) + i64::from(months);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
        Month::new(year, month)
    }

    pub fn pred(self) -> Option<Self> {
        self.add(-1)
    }

    pub fn succ(self) -> Option<Self> {
        self.add(1)
    }

    /// Number of days in the month.
    pub fn days(self) -> u32 {
        match self.month() {
            2 if is_leap(self.year()) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// 00:00:00 on the first day.
    pub fn first_instant(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// 23:59:59 on the last day: one month after the first instant, minus one second.
    pub fn last_instant(self) -> NaiveDateTime {
        self.first_instant() + Duration::days(i64::from(self.days())) - Duration::seconds(1)
    }

    fn month0(self) -> u32 {
        self.0.month0()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
