//! Defaults applied when the operator leaves a policy option unset.

/// Namespace scanned for disruption targets.
pub const DEFAULT_NAMESPACE: &str = "workloads";

/// Seconds between two disruption cycles.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Seconds granted to an instance for orderly shutdown.
///
/// Also used as the server-side timeout of the list request.
pub const DEFAULT_GRACE_PERIOD_SECS: u32 = 5;

/// Label selector an instance must satisfy to be considered at all.
pub const DEFAULT_LABEL_SELECTOR: &str = "podchaosmonkey=true";
