mod phase;
pub use phase::Phase;

use serde::{Deserialize, Serialize};

use crate::Labels;

/// A unit of compute as observed in the target namespace.
///
/// Instances are owned by the workload directory; the agent only reads instances and
/// requests their deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Unique name within the namespace.
    pub name: String,
    /// Namespace the instance lives in.
    pub namespace: String,
    /// Label mapping evaluated by the selector.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Lifecycle phase reported by the directory.
    #[serde(default)]
    pub phase: Phase,
    /// Finalizer tags blocking immediate removal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

impl Instance {
    /// Create an instance with no labels, no finalizers and an `Unknown` phase.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: Labels::new(),
            phase: Phase::Unknown,
            finalizers: Vec::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.labels.insert(key, val);
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_finalizer(mut self, finalizer: impl Into<String>) -> Self {
        self.finalizers.push(finalizer.into());
        self
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn has_finalizers(&self) -> bool {
        !self.finalizers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_instance_is_not_running() {
        let inst = Instance::new("web-0", "workloads");

        assert_eq!(inst.phase, Phase::Unknown);
        assert!(!inst.is_running());
        assert!(!inst.has_finalizers());
        assert!(inst.labels.is_empty());
    }

    #[test]
    fn builders_set_fields() {
        let inst = Instance::new("web-0", "workloads")
            .with_label("podchaosmonkey", "true")
            .with_phase(Phase::Running)
            .with_finalizer("kubernetes");

        assert!(inst.is_running());
        assert!(inst.has_finalizers());
        assert_eq!(inst.labels.get("podchaosmonkey"), Some("true"));
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let json = r#"{"name":"web-0","namespace":"workloads"}"#;
        let inst: Instance = serde_json::from_str(json).unwrap();

        assert_eq!(inst, Instance::new("web-0", "workloads"));
    }
}
