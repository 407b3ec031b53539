//! Metrics collection abstraction for the disruptor.
//!
//! Backends (prometheus, etc) implement [`MetricsBackend`] and are injected into the
//! [`crate::Disruptor`]. Without one, [`NoOpMetrics`] is used.
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, Operation, OutcomeKind};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
