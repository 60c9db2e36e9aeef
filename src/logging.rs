use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Selects the diagnostic log level (`off`, `error`, `warn`, `info`, `debug`,
/// `trace`).
pub const LOG_ENV: &str = "ADO_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

#[must_use]
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Sends diagnostics to stderr so stdout carries only help and status text.
pub fn init() {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
