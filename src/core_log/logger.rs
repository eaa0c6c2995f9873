use chrono::Local;
use colored::*;
use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the global logger: `[timestamp] [LEVEL] message`, level colored.
///
/// `RUST_LOG` wins over `verbose`, which only moves the default from info
/// to debug.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                colored_level(record.level()),
                record.args()
            )
        })
        .init();
}

fn colored_level(level: log::Level) -> ColoredString {
    let text = level.to_string();
    match level {
        log::Level::Error => text.red(),
        log::Level::Warn => text.yellow(),
        log::Level::Info => text.green(),
        log::Level::Debug => text.blue(),
        log::Level::Trace => text.white(),
    }
}
