//! In-memory doubles for the directory and metrics seams.
use std::sync::Mutex;

use async_trait::async_trait;
use pcm_model::{Instance, Phase};

use crate::{
    directory::{DirectoryError, DirectoryResult, WorkloadDirectory},
    metrics::{MetricsBackend, Operation, OutcomeKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { namespace: String, timeout_secs: u32 },
    Get { namespace: String, name: String },
    Delete { namespace: String, name: String, grace_period_secs: u32 },
}

#[derive(Default)]
struct State {
    instances: Vec<Instance>,
    calls: Vec<Call>,
    fail_list: bool,
    fail_delete: bool,
    vanish_before_get: bool,
    phase_on_get: Option<Phase>,
}

/// Directory backed by a vector, recording every call it receives.
#[derive(Default)]
pub struct MemoryDirectory {
    state: Mutex<State>,
}

impl MemoryDirectory {
    pub fn with_instances(instances: Vec<Instance>) -> Self {
        Self {
            state: Mutex::new(State {
                instances,
                ..State::default()
            }),
        }
    }

    pub fn failing_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    pub fn failing_delete(self) -> Self {
        self.state.lock().unwrap().fail_delete = true;
        self
    }

    /// Every instance disappears between list and get.
    pub fn vanishing(self) -> Self {
        self.state.lock().unwrap().vanish_before_get = true;
        self
    }

    /// The re-fetched copy reports `phase` instead of the listed one.
    pub fn phase_on_get(self, phase: Phase) -> Self {
        self.state.lock().unwrap().phase_on_get = Some(phase);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn remaining(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.instances.iter().map(|i| i.name.clone()).collect()
    }
}

#[async_trait]
impl WorkloadDirectory for MemoryDirectory {
    async fn list_instances(
        &self,
        namespace: &str,
        timeout_secs: u32,
    ) -> DirectoryResult<Vec<Instance>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List {
            namespace: namespace.to_string(),
            timeout_secs,
        });
        if state.fail_list {
            return Err(DirectoryError::Unavailable("connection refused".into()));
        }
        Ok(state
            .instances
            .iter()
            .filter(|i| i.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get_instance(&self, namespace: &str, name: &str) -> DirectoryResult<Instance> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        if state.vanish_before_get {
            state.instances.clear();
        }
        let phase = state.phase_on_get;
        state
            .instances
            .iter()
            .find(|i| i.namespace == namespace && i.name == name)
            .cloned()
            .map(|mut i| {
                if let Some(phase) = phase {
                    i.phase = phase;
                }
                i
            })
            .ok_or_else(|| DirectoryError::not_found(namespace, name))
    }

    async fn delete_instance(
        &self,
        namespace: &str,
        name: &str,
        grace_period_secs: u32,
    ) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete {
            namespace: namespace.to_string(),
            name: name.to_string(),
            grace_period_secs,
        });
        if state.fail_delete {
            return Err(DirectoryError::Rejected("forbidden".into()));
        }
        let before = state.instances.len();
        state
            .instances
            .retain(|i| !(i.namespace == namespace && i.name == name));
        if state.instances.len() == before {
            return Err(DirectoryError::not_found(namespace, name));
        }
        Ok(())
    }
}

/// Metrics backend that remembers what it was told.
#[derive(Default)]
pub struct RecordingMetrics {
    pub cycles: Mutex<Vec<OutcomeKind>>,
    pub observed: Mutex<Vec<(usize, usize)>>,
    pub errors: Mutex<Vec<Operation>>,
}

impl MetricsBackend for RecordingMetrics {
    fn record_cycle(&self, outcome: OutcomeKind) {
        self.cycles.lock().unwrap().push(outcome);
    }

    fn record_observed(&self, observed: usize, eligible: usize) {
        self.observed.lock().unwrap().push((observed, eligible));
    }

    fn record_directory_error(&self, operation: Operation) {
        self.errors.lock().unwrap().push(operation);
    }
}
