pub mod directory;
pub mod disruptor;
pub mod filter;
pub mod metrics;
pub mod picker;

#[cfg(test)]
mod testing;

pub use directory::{DirectoryError, DirectoryHandle, DirectoryResult, WorkloadDirectory};
pub use disruptor::{CycleOutcome, CycleReport, Disruptor};
pub use filter::{Eligibility, eligibility, select};
pub use metrics::{
    MetricsBackend, MetricsHandle, NoOpMetrics, Operation, OutcomeKind, noop_metrics,
};
pub use picker::pick;

pub mod prelude {
    pub use crate::directory::{DirectoryError, WorkloadDirectory};
    pub use crate::disruptor::{CycleOutcome, CycleReport, Disruptor};
    pub use crate::metrics::MetricsBackend;
}
