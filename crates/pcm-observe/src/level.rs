use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{LoggerError, LoggerResult};

/// A validated `EnvFilter` expression, e.g. `info` or `pcm_core=debug,info`.
///
/// The raw string is kept so the value can be logged and serialized as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(String);

impl LogLevel {
    pub fn new(s: impl Into<String>) -> LoggerResult<Self> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the filter for a subscriber.
    pub fn to_env_filter(&self) -> LoggerResult<EnvFilter> {
        EnvFilter::try_new(&self.0).map_err(|e| LoggerError::InvalidLevel {
            input: self.0.clone(),
            reason: e.to_string(),
        })
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel("info".to_string())
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LoggerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LoggerError::InvalidLevel {
                input: s,
                reason: "empty filter".into(),
            });
        }
        let level = LogLevel(trimmed.to_string());
        level.to_env_filter()?;
        Ok(level)
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<LogLevel> for String {
    fn from(l: LogLevel) -> Self {
        l.0
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels_and_directives() {
        for input in ["info", "warn", "trace", "pcm_core=debug,kube=warn,info"] {
            let lvl = input.parse::<LogLevel>();
            assert!(lvl.is_ok(), "{input} should parse: {lvl:?}");
            assert!(lvl.unwrap().to_env_filter().is_ok());
        }
    }

    #[test]
    fn rejects_bad_directives() {
        for input in ["pcm_core=loud", "info,kube=verbose", "   "] {
            assert!(
                matches!(input.parse::<LogLevel>(), Err(LoggerError::InvalidLevel { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn keeps_the_trimmed_expression() {
        let lvl = LogLevel::new("  debug ").unwrap();
        assert_eq!(lvl.as_str(), "debug");
        assert_eq!(lvl.to_string(), "debug");
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LogLevel::default().as_str(), "info");
        assert!(LogLevel::default().to_env_filter().is_ok());
    }

    #[test]
    fn deserializing_validates() {
        let ok: LogLevel = serde_json::from_str(r#""pcm_kube=trace,info""#).unwrap();
        assert_eq!(ok.as_str(), "pcm_kube=trace,info");
        assert!(serde_json::from_str::<LogLevel>(r#""x=nope""#).is_err());
    }
}
