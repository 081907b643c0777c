use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Install the CLI logger: this crate at Info (Debug when `verbose`), dependencies at Warn.
/// `RUST_LOG` still applies on top. A second call is a no-op.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let line = match record.level() {
                Level::Error => format!(
                    "[{} {} {}] {}",
                    name,
                    "ERROR".red(),
                    record.target().white(),
                    record.args()
                ),
                Level::Warn => format!(
                    "[{} {} {}] {}",
                    name,
                    "WARN".yellow(),
                    record.target().white(),
                    record.args()
                ),
                Level::Debug | Level::Trace => format!(
                    "[{} {}] {}",
                    name,
                    record.target().dimmed(),
                    record.args()
                ),
                Level::Info => format!("[{}] {}", name, record.args()),
            };
            writeln!(buf, "{line}")
        })
        .try_init();
}
