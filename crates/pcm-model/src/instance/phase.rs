use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Lifecycle phase of an instance.
///
/// Only [`Phase::Running`] instances are ever disrupted.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Accepted but not all containers are up yet.
    Pending,
    /// Bound to a node with at least one container running.
    Running,
    /// All containers terminated successfully.
    Succeeded,
    /// All containers terminated, at least one in failure.
    Failed,
    /// State could not be obtained, or was not reported at all.
    #[default]
    Unknown,
}

impl Phase {
    /// Map an optional status string as reported by the directory.
    ///
    /// Missing or unrecognised values collapse to [`Phase::Unknown`].
    pub fn from_status(status: Option<&str>) -> Self {
        status.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pending => "Pending",
            Phase::Running => "Running",
            Phase::Succeeded => "Succeeded",
            Phase::Failed => "Failed",
            Phase::Unknown => "Unknown",
        }
    }
}

impl FromStr for Phase {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Phase::Pending),
            "running" => Ok(Phase::Running),
            "succeeded" => Ok(Phase::Succeeded),
            "failed" => Ok(Phase::Failed),
            "unknown" => Ok(Phase::Unknown),
            _ => Err(ModelError::UnknownPhase(s.to_string())),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Phase;

    #[test]
    fn parses_case_insensitive() {
        assert_eq!("Running".parse::<Phase>().unwrap(), Phase::Running);
        assert_eq!("running".parse::<Phase>().unwrap(), Phase::Running);
        assert_eq!(" PENDING ".parse::<Phase>().unwrap(), Phase::Pending);
        assert_eq!("Succeeded".parse::<Phase>().unwrap(), Phase::Succeeded);
        assert_eq!("failed".parse::<Phase>().unwrap(), Phase::Failed);
    }

    #[test]
    fn rejects_unknown_strings() {
        for bad in ["", "Terminating", "CrashLoopBackOff"] {
            assert!(bad.parse::<Phase>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn from_status_falls_back_to_unknown() {
        assert_eq!(Phase::from_status(None), Phase::Unknown);
        assert_eq!(Phase::from_status(Some("Evicted")), Phase::Unknown);
        assert_eq!(Phase::from_status(Some("Running")), Phase::Running);
    }

    #[test]
    fn display_matches_directory_spelling() {
        for phase in [
            Phase::Pending,
            Phase::Running,
            Phase::Succeeded,
            Phase::Failed,
            Phase::Unknown,
        ] {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
    }
}
