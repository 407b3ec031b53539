use crate::metrics::backend::{MetricsBackend, Operation, OutcomeKind};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_cycle(&self, _: OutcomeKind) {}

    #[inline(always)]
    fn record_observed(&self, _: usize, _: usize) {}

    #[inline(always)]
    fn record_directory_error(&self, _: Operation) {}
}
