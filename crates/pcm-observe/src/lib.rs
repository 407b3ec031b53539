//! Process-wide logging setup for the chaos agent.
//!
//! A [`LoggerConfig`] picks the output format (text, JSON or journald), the filter
//! expression and the timestamp zone; [`init_logger`] installs the matching subscriber.
mod clock;
mod config;
mod error;
mod format;
mod install;
mod level;

pub use clock::{LogTimeZone, init_local_offset};
pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LogFormat;
pub use level::LogLevel;

/// Install the global tracing subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a subscriber is already set.
/// With [`LogTimeZone::Local`], call [`init_local_offset`] first, before any thread exists.
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LogFormat::Text => install::text(cfg),
        LogFormat::Json => install::json(cfg),
        LogFormat::Journald => install::journald(cfg),
    }
}
