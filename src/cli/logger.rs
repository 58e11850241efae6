//! Log output for the command-line tool.

/// Environment variable holding the log level filter (`debug`, `trace`, ...).
pub const LOG_ENV_VAR: &str = "AHOCORASICK_LOG";

/// Route `log` records to stderr as `[LEVEL] message` lines.
///
/// Logging is off unless [`LOG_ENV_VAR`] names a level.
pub fn init() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(
            std::env::var(LOG_ENV_VAR)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(log::LevelFilter::Off),
        )
        .chain(std::io::stderr())
        .apply()
}
