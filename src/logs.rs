use std::fmt;
use std::sync::Arc;

use log::{Level, Log, Metadata, Record};

/// The pair of sinks every logging call goes through. Errors always have a live sink; the info
/// sink is a [`Discard`] unless the run is verbose.
#[derive(Clone)]
pub struct Logs {
    err: Arc<dyn Log>,
    info: Arc<dyn Log>,
}

impl Logs {
    pub fn new(err: Arc<dyn Log>, info: Arc<dyn Log>) -> Self {
        Self { err, info }
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        emit(self.err.as_ref(), Level::Error, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        emit(self.info.as_ref(), Level::Info, args);
    }
}

fn emit(sink: &dyn Log, level: Level, args: fmt::Arguments<'_>) {
    let record = Record::builder()
        .args(args)
        .level(level)
        .target(env!("CARGO_PKG_NAME"))
        .build();
    if sink.enabled(record.metadata()) {
        sink.log(&record);
    }
}

/// Sink that drops everything.
pub struct Discard;

impl Log for Discard {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        false
    }

    fn log(&self, _: &Record<'_>) {}

    fn flush(&self) {}
}
