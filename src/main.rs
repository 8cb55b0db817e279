use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use log::{LevelFilter, Log};
use simple_logger::SimpleLogger;
use time::macros::format_description;

use t3rep::db::Sqlite;
use t3rep::logs::{Discard, Logs};
use t3rep::{config, dispatch};

#[derive(Parser)]
#[command(name = "t3rep")]
#[command(
    about = "Generates monthly CSV reports for every system listed in a JSON configuration file."
)]
#[command(version)]
struct Cli {
    #[arg(value_name = "CONFFILE", help = "Path to the JSON configuration file")]
    config: PathBuf,
    #[arg(
        short,
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Number of concurrent report creations (at least 1)"
    )]
    parallel: i64,
    #[arg(short, long, help = "Show information messages for debugging")]
    verbose: bool,
}

fn sink(level: LevelFilter) -> Arc<dyn Log> {
    Arc::new(
        SimpleLogger::new()
            .with_level(level)
            .with_timestamp_format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            )),
    )
}

fn main() {
    let cli = Cli::parse();

    let info = if cli.verbose {
        sink(LevelFilter::Info)
    } else {
        Arc::new(Discard) as Arc<dyn Log>
    };
    let logs = Logs::new(sink(LevelFilter::Error), info);

    let conf = match config::load(&cli.config) {
        Ok(conf) => conf,
        Err(e) => {
            logs.error(format_args!("fatal: cannot start: {:#}", e));
            process::exit(1);
        }
    };
    logs.info(format_args!(
        "{} systems, {} months back, writing to {}",
        conf.systems.len(),
        conf.months,
        conf.directory.display()
    ));

    let summary = dispatch::run(&Sqlite, &conf, &logs, Local::now().naive_local(), cli.parallel);
    if summary.is_clean() {
        logs.info(format_args!("done: {}", summary));
    } else {
        logs.error(format_args!("done with failures: {}", summary));
    }
}
