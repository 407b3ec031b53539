use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{clock::LogTimeZone, format::LogFormat, level::LogLevel};

/// Logger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LogFormat,
    /// Filter expression, e.g. `info` or `pcm_core=debug,info`.
    pub level: LogLevel,
    pub tz: LogTimeZone,
    /// Print the event target (module path) on each line.
    pub with_targets: bool,
    /// ANSI colors for text output; also requires stdout to be a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::default(),
            tz: LogTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_tz(mut self, tz: LogTimeZone) -> Self {
        self.tz = tz;
        self
    }

    /// Colors are used only when enabled and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
