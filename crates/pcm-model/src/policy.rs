use std::time::Duration;

use crate::{
    DEFAULT_GRACE_PERIOD_SECS, DEFAULT_INTERVAL_SECS, DEFAULT_LABEL_SELECTOR, DEFAULT_NAMESPACE,
    Flag, Selector,
    error::{ModelError, ModelResult},
};

/// Immutable operating configuration of the disruptor.
///
/// Built once at startup and handed to the control loop by value; nothing re-reads
/// configuration while the loop runs.
#[derive(Clone, Debug)]
pub struct Policy {
    namespace: String,
    interval_secs: u64,
    grace_period_secs: u32,
    selector: Selector,
    include_finalizers: Flag,
}

impl Policy {
    /// Validating constructor.
    ///
    /// Rules:
    /// - `namespace` is not empty or whitespace-only;
    /// - `interval_secs` is at least one second.
    pub fn new(
        namespace: impl Into<String>,
        interval_secs: u64,
        grace_period_secs: u32,
        selector: Selector,
        include_finalizers: Flag,
    ) -> ModelResult<Self> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(ModelError::Invalid("namespace is empty".into()));
        }
        if interval_secs == 0 {
            return Err(ModelError::Invalid(
                "interval must be at least one second".into(),
            ));
        }
        Ok(Self {
            namespace,
            interval_secs,
            grace_period_secs,
            selector,
            include_finalizers,
        })
    }

    /// Replace the selector and return the updated policy.
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    /// Replace the finalizer opt-in and return the updated policy.
    pub fn with_include_finalizers(mut self, include: Flag) -> Self {
        self.include_finalizers = include;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Pause between two cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Grace period passed on deletion; also the list request timeout.
    pub fn grace_period_secs(&self) -> u32 {
        self.grace_period_secs
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn include_finalizers(&self) -> Flag {
        self.include_finalizers
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            selector: Selector::parse(DEFAULT_LABEL_SELECTOR)
                .expect("default label selector must be valid"),
            include_finalizers: Flag::disabled(),
        }
    }
}
