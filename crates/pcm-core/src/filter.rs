//! Eligibility filter: which observed instances may be disrupted under a policy.
//!
//! Checks run in a fixed order (labels, phase, finalizers) and the first failing check
//! decides the verdict. Everything here is a pure function of its inputs.
use std::fmt;

use pcm_model::{Instance, Policy};

/// Verdict for a single instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Passes every check.
    Eligible,
    /// Labels do not satisfy the policy selector.
    LabelMismatch,
    /// Phase is anything but `Running`.
    NotRunning,
    /// Carries finalizers and the policy does not opt in.
    HasFinalizers,
}

impl Eligibility {
    #[inline]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Eligibility::Eligible => "eligible",
            Eligibility::LabelMismatch => "label_mismatch",
            Eligibility::NotRunning => "not_running",
            Eligibility::HasFinalizers => "has_finalizers",
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate one instance against the policy.
pub fn eligibility(instance: &Instance, policy: &Policy) -> Eligibility {
    if !policy.selector().matches(&instance.labels) {
        return Eligibility::LabelMismatch;
    }
    if !instance.is_running() {
        return Eligibility::NotRunning;
    }
    if instance.has_finalizers() && policy.include_finalizers().is_disabled() {
        return Eligibility::HasFinalizers;
    }
    Eligibility::Eligible
}

/// Return the eligible sub-sequence of `instances`, preserving relative order.
///
/// Empty input or no matches yields an empty vector.
pub fn select(instances: &[Instance], policy: &Policy) -> Vec<Instance> {
    instances
        .iter()
        .filter(|i| eligibility(i, policy).is_eligible())
        .cloned()
        .collect()
}
