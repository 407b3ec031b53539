use std::sync::Arc;

use prometheus::{CounterVec, IntGauge, Opts, Registry, TextEncoder, proto::MetricFamily};

use pcm_core::{MetricsBackend, Operation, OutcomeKind};

const NAMESPACE: &str = "pcm";

/// Prometheus implementation of [`MetricsBackend`].
///
/// Label values are bounded: `outcome` takes one of the [`OutcomeKind`] labels and
/// `operation` one of `list`, `get`, `delete`. Instance names are never used as labels.
#[derive(Clone)]
pub struct PrometheusMetrics {
    cycles: CounterVec,
    observed: IntGauge,
    eligible: IntGauge,
    directory_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Register the collectors in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let cycles = CounterVec::new(
            Opts::new("cycles_total", "Disruption cycles by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(cycles.clone()))?;

        let observed = IntGauge::with_opts(
            Opts::new(
                "instances_observed",
                "Instances returned by the last successful list",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(observed.clone()))?;

        let eligible = IntGauge::with_opts(
            Opts::new(
                "instances_eligible",
                "Instances that passed the eligibility filter in the last cycle",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(eligible.clone()))?;

        let directory_errors = CounterVec::new(
            Opts::new("directory_errors_total", "Failed directory calls by operation")
                .namespace(NAMESPACE),
            &["operation"],
        )?;
        registry.register(Box::new(directory_errors.clone()))?;

        Ok(Self {
            cycles,
            observed,
            eligible,
            directory_errors,
            registry,
        })
    }

    /// Register the collectors in a fresh private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Everything in the registry, in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.gather())
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_cycle(&self, outcome: OutcomeKind) {
        self.cycles.with_label_values(&[outcome.as_label()]).inc();
    }

    fn record_observed(&self, observed: usize, eligible: usize) {
        self.observed.set(i64::try_from(observed).unwrap_or(i64::MAX));
        self.eligible.set(i64::try_from(eligible).unwrap_or(i64::MAX));
    }

    fn record_directory_error(&self, operation: Operation) {
        self.directory_errors
            .with_label_values(&[operation.as_label()])
            .inc();
    }
}
