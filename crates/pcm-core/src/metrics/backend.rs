use std::sync::Arc;

/// Outcome of one disruption cycle, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// An instance was deleted.
    Terminated,
    /// Nothing passed the eligibility filter.
    NoEligibleTargets,
    /// Listing the namespace failed.
    ListFailed,
    /// Re-fetching the chosen instance failed.
    VerifyFailed,
    /// The re-fetched instance was no longer eligible.
    NoLongerEligible,
    /// The delete request failed.
    DeleteFailed,
}

impl OutcomeKind {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            OutcomeKind::Terminated => "terminated",
            OutcomeKind::NoEligibleTargets => "no_eligible_targets",
            OutcomeKind::ListFailed => "list_failed",
            OutcomeKind::VerifyFailed => "verify_failed",
            OutcomeKind::NoLongerEligible => "no_longer_eligible",
            OutcomeKind::DeleteFailed => "delete_failed",
        }
    }
}

/// Directory operation, for error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Delete,
}

impl Operation {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Delete => "delete",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the end of a cycle.
    ///
    /// Called exactly once per cycle, after the outcome is known.
    fn record_cycle(&self, outcome: OutcomeKind);

    /// Record how many instances the last successful list returned and how many passed the filter.
    fn record_observed(&self, observed: usize, eligible: usize);

    /// Record a failed directory call.
    ///
    /// Separate from the cycle outcome: a `NotFound` on verify is both a `Get` error and a `VerifyFailed` cycle.
    fn record_directory_error(&self, operation: Operation);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
