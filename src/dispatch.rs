use std::fmt;
use std::thread;

use chrono::NaiveDateTime;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::config::Conf;
use crate::db::Connector;
use crate::logs::Logs;
use crate::task::{Tally, Task};

/// Outcome of a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub systems: usize,
    pub reports: Tally,
    /// Systems whose task failed before generating anything, sorted by name.
    pub failed_systems: Vec<String>,
}

impl Summary {
    pub fn is_clean(&self) -> bool {
        self.reports.failed == 0 && self.failed_systems.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} systems ({} failed): {} reports generated, {} skipped, {} failed",
            self.systems,
            self.failed_systems.len(),
            self.reports.generated,
            self.reports.skipped,
            self.reports.failed
        )
    }
}

/// Counting admission gate. Each slot of the bounded channel is one permit.
struct Gate {
    slots: Sender<()>,
    taken: Receiver<()>,
}

impl Gate {
    fn new(permits: usize) -> Self {
        let (slots, taken) = bounded(permits);
        Self { slots, taken }
    }

    fn acquire(&self) -> Permit<'_> {
        // cannot fail, the gate owns the receiving side
        let _ = self.slots.send(());
        Permit(self)
    }
}

struct Permit<'a>(&'a Gate);

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.0.taken.recv();
    }
}

/// Number of permits for a requested parallelism over `tasks` tasks: at least one, and never
/// more than there are tasks to admit.
pub fn permits(parallel: i64, tasks: usize) -> usize {
    usize::try_from(parallel)
        .unwrap_or(0)
        .min(tasks)
        .max(1)
}

/// Runs one task per configured system, at most `parallel` at a time, and waits for all of them.
/// A failing system is logged and never stops the others.
pub fn run<C: Connector>(
    connector: &C,
    conf: &Conf,
    logs: &Logs,
    now: NaiveDateTime,
    parallel: i64,
) -> Summary {
    let gate = Gate::new(permits(parallel, conf.systems.len()));
    let (results, collected) = unbounded();
    let mut summary = Summary {
        systems: conf.systems.len(),
        ..Summary::default()
    };

    thread::scope(|s| {
        for (name, dsn) in &conf.systems {
            let results = results.clone();
            let gate = &gate;
            s.spawn(move || {
                let _permit = gate.acquire();
                let task = Task::new(now, name, dsn, conf);
                let result = task.exec(connector, logs);
                let _ = results.send((task.name().to_string(), result));
            });
        }
        drop(results);

        for (name, result) in collected.iter() {
            match result {
                Ok(tally) => summary.reports += tally,
                Err(e) => {
                    logs.error(format_args!("fatal: {}: creating report: {}", name, e));
                    summary.failed_systems.push(name);
                }
            }
        }
    });

    summary.failed_systems.sort();
    summary
}
