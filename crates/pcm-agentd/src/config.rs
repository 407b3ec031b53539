use std::{net::SocketAddr, path::PathBuf};

use envconfig::Envconfig;
use thiserror::Error;

use pcm_model::{Flag, ModelError, Policy, Selector};
use pcm_observe::{LogFormat, LogLevel, LogTimeZone, LoggerConfig, LoggerError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envconfig::Error),

    #[error("invalid policy: {0}")]
    Policy(#[from] ModelError),

    #[error("invalid logger setting: {0}")]
    Logger(#[from] LoggerError),

    #[error("invalid {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Agent settings, read once from the environment at startup.
#[derive(Envconfig, Clone, Debug)]
pub struct AgentConfig {
    #[envconfig(from = "NAMESPACE", default = "workloads")]
    pub namespace: String,
    #[envconfig(from = "INTERVAL_IN_SECONDS", default = "10")]
    pub interval_secs: u64,
    /// Also used as the list timeout.
    #[envconfig(from = "GRACE_PERIOD_SECONDS", default = "5")]
    pub grace_period_secs: u32,
    /// Label selector, e.g. `app=web,tier in (a,b)`.
    #[envconfig(from = "LABELS", default = "podchaosmonkey=true")]
    pub labels: String,
    #[envconfig(from = "INCLUDE_FINALIZERS", default = "false")]
    pub include_finalizers: String,
    /// Out-of-cluster credentials; in-cluster service account when unset.
    #[envconfig(from = "KUBECONFIG")]
    pub kubeconfig: Option<String>,
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,
    #[envconfig(from = "LOG_FORMAT", default = "text")]
    pub log_format: String,
    #[envconfig(from = "LOG_TIMEZONE", default = "utc")]
    pub log_timezone: String,
    /// `/metrics` listen address; the endpoint is off when unset.
    #[envconfig(from = "METRICS_ADDR")]
    pub metrics_addr: Option<String>,
}

impl AgentConfig {
    pub fn policy(&self) -> Result<Policy, ConfigError> {
        let selector = Selector::parse(&self.labels)?;
        let include_finalizers = parse_flag("INCLUDE_FINALIZERS", &self.include_finalizers)?;
        Ok(Policy::new(
            self.namespace.trim(),
            self.interval_secs,
            self.grace_period_secs,
            selector,
            include_finalizers,
        )?)
    }

    pub fn logger_config(&self) -> Result<LoggerConfig, ConfigError> {
        Ok(LoggerConfig::default()
            .with_level(self.log_level.parse::<LogLevel>()?)
            .with_format(self.log_format.parse::<LogFormat>()?)
            .with_tz(self.log_timezone.parse::<LogTimeZone>()?))
    }

    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.kubeconfig
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        let Some(raw) = self.metrics_addr.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "METRICS_ADDR",
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<Flag, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Flag::enabled()),
        "false" | "0" | "no" | "off" | "" => Ok(Flag::disabled()),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AgentConfig, envconfig::Error> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::init_from_hashmap(&env)
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let cfg = load(&[]).unwrap();
        let policy = cfg.policy().unwrap();

        assert_eq!(policy.namespace(), "workloads");
        assert_eq!(policy.interval_secs(), 10);
        assert_eq!(policy.grace_period_secs(), 5);
        assert_eq!(policy.selector().to_string(), "podchaosmonkey=true");
        assert!(policy.include_finalizers().is_disabled());
        assert_eq!(cfg.credentials_path(), None);
        assert_eq!(cfg.metrics_addr().unwrap(), None);
    }

    #[test]
    fn every_variable_is_honoured() {
        let cfg = load(&[
            ("NAMESPACE", "payments"),
            ("INTERVAL_IN_SECONDS", "30"),
            ("GRACE_PERIOD_SECONDS", "0"),
            ("LABELS", "app=web,tier!=db"),
            ("INCLUDE_FINALIZERS", "True"),
            ("KUBECONFIG", "/etc/pcm/kubeconfig"),
            ("LOG_LEVEL", "pcm_core=debug,info"),
            ("LOG_FORMAT", "json"),
            ("LOG_TIMEZONE", "local"),
            ("METRICS_ADDR", "0.0.0.0:9090"),
        ])
        .unwrap();

        let policy = cfg.policy().unwrap();
        assert_eq!(policy.namespace(), "payments");
        assert_eq!(policy.interval_secs(), 30);
        assert_eq!(policy.grace_period_secs(), 0);
        assert_eq!(policy.selector().requirements().len(), 2);
        assert!(policy.include_finalizers().is_enabled());
        assert_eq!(
            cfg.credentials_path(),
            Some(PathBuf::from("/etc/pcm/kubeconfig"))
        );
        assert_eq!(
            cfg.metrics_addr().unwrap(),
            Some("0.0.0.0:9090".parse().unwrap())
        );

        let logger = cfg.logger_config().unwrap();
        assert_eq!(logger.format, LogFormat::Json);
        assert_eq!(logger.level.as_str(), "pcm_core=debug,info");
        assert_eq!(logger.tz, LogTimeZone::Local);
    }

    #[test]
    fn malformed_selector_is_fatal() {
        let cfg = load(&[("LABELS", "app in (")]).unwrap();
        assert!(matches!(cfg.policy(), Err(ConfigError::Policy(_))));
    }

    #[test]
    fn zero_interval_is_fatal() {
        let cfg = load(&[("INTERVAL_IN_SECONDS", "0")]).unwrap();
        assert!(matches!(cfg.policy(), Err(ConfigError::Policy(_))));
    }

    #[test]
    fn non_numeric_interval_fails_to_load() {
        assert!(load(&[("INTERVAL_IN_SECONDS", "ten")]).is_err());
        assert!(load(&[("GRACE_PERIOD_SECONDS", "-1")]).is_err());
    }

    #[test]
    fn finalizer_flag_spellings() {
        for (raw, expected) in [("true", true), ("1", true), ("FALSE", false), ("no", false)] {
            assert_eq!(
                parse_flag("INCLUDE_FINALIZERS", raw).unwrap().is_enabled(),
                expected,
                "{raw}"
            );
        }
        assert!(matches!(
            parse_flag("INCLUDE_FINALIZERS", "maybe"),
            Err(ConfigError::Invalid { name: "INCLUDE_FINALIZERS", .. })
        ));
    }

    #[test]
    fn blank_optional_values_are_unset() {
        let cfg = load(&[("KUBECONFIG", "  "), ("METRICS_ADDR", "")]).unwrap();
        assert_eq!(cfg.credentials_path(), None);
        assert_eq!(cfg.metrics_addr().unwrap(), None);
    }

    #[test]
    fn bad_metrics_address_is_reported() {
        let cfg = load(&[("METRICS_ADDR", "localhost")]).unwrap();
        assert!(matches!(
            cfg.metrics_addr(),
            Err(ConfigError::Invalid { name: "METRICS_ADDR", .. })
        ));
    }

    #[test]
    fn bad_log_format_is_reported() {
        let cfg = load(&[("LOG_FORMAT", "xml")]).unwrap();
        assert!(matches!(cfg.logger_config(), Err(ConfigError::Logger(_))));
    }
}
