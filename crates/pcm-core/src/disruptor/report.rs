use std::fmt;

use crate::metrics::OutcomeKind;

/// How a single cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The chosen instance was verified and its deletion accepted.
    Terminated { name: String },
    /// Nothing passed the eligibility filter; no call beyond the list was made.
    NoEligibleTargets,
    /// Listing the namespace failed.
    ListFailed { reason: String },
    /// Re-fetching the chosen instance failed (typically: it is already gone).
    VerifyFailed { name: String, reason: String },
    /// The re-fetched instance no longer passes the eligibility filter.
    NoLongerEligible { name: String, reason: String },
    /// The delete request failed.
    DeleteFailed { name: String, reason: String },
}

impl CycleOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            CycleOutcome::Terminated { .. } => OutcomeKind::Terminated,
            CycleOutcome::NoEligibleTargets => OutcomeKind::NoEligibleTargets,
            CycleOutcome::ListFailed { .. } => OutcomeKind::ListFailed,
            CycleOutcome::VerifyFailed { .. } => OutcomeKind::VerifyFailed,
            CycleOutcome::NoLongerEligible { .. } => OutcomeKind::NoLongerEligible,
            CycleOutcome::DeleteFailed { .. } => OutcomeKind::DeleteFailed,
        }
    }

    /// Name of the instance the cycle acted on, if it got that far.
    pub fn target(&self) -> Option<&str> {
        match self {
            CycleOutcome::Terminated { name }
            | CycleOutcome::VerifyFailed { name, .. }
            | CycleOutcome::NoLongerEligible { name, .. }
            | CycleOutcome::DeleteFailed { name, .. } => Some(name),
            CycleOutcome::NoEligibleTargets | CycleOutcome::ListFailed { .. } => None,
        }
    }

    /// Why the cycle stopped short, if it did.
    pub fn reason(&self) -> Option<&str> {
        match self {
            CycleOutcome::ListFailed { reason }
            | CycleOutcome::VerifyFailed { reason, .. }
            | CycleOutcome::NoLongerEligible { reason, .. }
            | CycleOutcome::DeleteFailed { reason, .. } => Some(reason),
            CycleOutcome::Terminated { .. } | CycleOutcome::NoEligibleTargets => None,
        }
    }

    /// One-line log message.
    pub fn summary(&self) -> &'static str {
        match self {
            CycleOutcome::Terminated { .. } => "instance terminated",
            CycleOutcome::NoEligibleTargets => "no eligible instances; nothing to terminate",
            CycleOutcome::ListFailed { .. } => "failed to list instances; cycle skipped",
            CycleOutcome::VerifyFailed { .. } => {
                "chosen instance could not be re-fetched; termination aborted"
            }
            CycleOutcome::NoLongerEligible { .. } => {
                "chosen instance is no longer eligible; termination aborted"
            }
            CycleOutcome::DeleteFailed { .. } => "failed to delete instance",
        }
    }

    /// `true` if a directory call failed during the cycle; such cycles are logged at `warn`.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CycleOutcome::ListFailed { .. }
                | CycleOutcome::VerifyFailed { .. }
                | CycleOutcome::DeleteFailed { .. }
        )
    }
}

/// Summary of one cycle: counts and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Instances returned by the list call (0 if it failed).
    pub observed: usize,
    /// Instances that passed the eligibility filter.
    pub eligible: usize,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub(crate) fn new(observed: usize, eligible: usize, outcome: CycleOutcome) -> Self {
        Self {
            observed,
            eligible,
            outcome,
        }
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CycleReport(observed={}, eligible={}, outcome={}",
            self.observed,
            self.eligible,
            self.outcome.kind().as_label()
        )?;
        if let Some(target) = self.outcome.target() {
            write!(f, ", target={target}")?;
        }
        f.write_str(")")
    }
}
