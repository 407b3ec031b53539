//! Disruption control loop.
//!
//! One cycle: list the namespace, filter, pick one eligible instance at random, re-fetch it
//! by name, delete it with the configured grace period. Cycles never overlap and are
//! separated by the policy interval. Directory failures end the current cycle only.
mod report;
pub use report::{CycleOutcome, CycleReport};

use rand::{SeedableRng, rngs::StdRng};
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info, instrument, trace, warn};

use pcm_model::Policy;

use crate::{
    directory::DirectoryHandle,
    filter::{eligibility, select},
    metrics::{MetricsHandle, Operation, noop_metrics},
    picker::pick,
};

/// Owner of the disruption loop.
///
/// Holds the immutable [`Policy`], the directory backend, a metrics handle and the random
/// source used for target selection.
pub struct Disruptor {
    directory: DirectoryHandle,
    policy: Policy,
    metrics: MetricsHandle,
    rng: StdRng,
}

impl Disruptor {
    /// Create a disruptor with no-op metrics and an OS-seeded random source.
    pub fn new(directory: DirectoryHandle, policy: Policy) -> Self {
        Self {
            directory,
            policy,
            metrics: noop_metrics(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replace the metrics backend and return the updated disruptor.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the random source and return the updated disruptor.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Run cycles until `cancel` fires.
    ///
    /// Cancellation is observed before each cycle and during the sleep between cycles;
    /// a cycle that has already started runs to completion.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            namespace = self.policy.namespace(),
            interval_secs = self.policy.interval_secs(),
            grace_period_secs = self.policy.grace_period_secs(),
            selector = %self.policy.selector(),
            include_finalizers = self.policy.include_finalizers().is_enabled(),
            "disruptor started"
        );

        while !cancel.is_cancelled() {
            self.run_cycle().await;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.policy.interval()) => {}
            }
        }
        info!("disruptor stopped");
    }

    /// Run exactly one cycle, log its outcome and report it to the metrics backend.
    #[instrument(level = "debug", skip(self), fields(namespace = %self.policy.namespace()))]
    pub async fn run_cycle(&mut self) -> CycleReport {
        let report = self.act().await;
        self.record(&report);
        report
    }

    async fn act(&mut self) -> CycleReport {
        let namespace = self.policy.namespace();
        let grace = self.policy.grace_period_secs();

        let observed = match self.directory.list_instances(namespace, grace).await {
            Ok(list) => list,
            Err(e) => {
                self.metrics.record_directory_error(Operation::List);
                return CycleReport::new(
                    0,
                    0,
                    CycleOutcome::ListFailed {
                        reason: e.to_string(),
                    },
                );
            }
        };

        if tracing::enabled!(Level::TRACE) {
            for inst in &observed {
                trace!(
                    instance = %inst.name,
                    phase = %inst.phase,
                    finalizers = inst.finalizers.len(),
                    verdict = %eligibility(inst, &self.policy),
                    "instance evaluated"
                );
            }
        }

        let eligible = select(&observed, &self.policy);
        self.metrics.record_observed(observed.len(), eligible.len());

        let Some(chosen) = pick(&eligible, &mut self.rng) else {
            return CycleReport::new(observed.len(), 0, CycleOutcome::NoEligibleTargets);
        };
        let name = chosen.name.clone();
        debug!(instance = %name, eligible = eligible.len(), "instance selected");

        let report = |outcome| CycleReport::new(observed.len(), eligible.len(), outcome);

        // The list is a snapshot; the instance may have gone or changed since.
        let verified = match self.directory.get_instance(namespace, &name).await {
            Ok(inst) => inst,
            Err(e) => {
                self.metrics.record_directory_error(Operation::Get);
                return report(CycleOutcome::VerifyFailed {
                    name,
                    reason: e.to_string(),
                });
            }
        };

        let verdict = eligibility(&verified, &self.policy);
        if !verdict.is_eligible() {
            return report(CycleOutcome::NoLongerEligible {
                name,
                reason: verdict.to_string(),
            });
        }

        let deleted = self
            .directory
            .delete_instance(namespace, &verified.name, grace)
            .await;
        match deleted {
            Ok(()) => report(CycleOutcome::Terminated {
                name: verified.name,
            }),
            Err(e) => {
                self.metrics.record_directory_error(Operation::Delete);
                report(CycleOutcome::DeleteFailed {
                    name: verified.name,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn record(&self, report: &CycleReport) {
        self.metrics.record_cycle(report.outcome.kind());

        let namespace = self.policy.namespace();
        let outcome = report.outcome.kind().as_label();
        let instance = report.outcome.target().unwrap_or_default();
        let reason = report.outcome.reason().unwrap_or_default();
        let (observed, eligible) = (report.observed, report.eligible);

        if report.outcome.is_failure() {
            warn!(
                namespace,
                observed,
                eligible,
                outcome,
                instance,
                error = reason,
                "{}",
                report.outcome.summary()
            );
        } else {
            info!(
                namespace,
                observed,
                eligible,
                outcome,
                instance,
                reason,
                grace_period_secs = self.policy.grace_period_secs(),
                "{}",
                report.outcome.summary()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use pcm_model::{Flag, Instance, Phase, Selector};

    use super::*;
    use crate::{
        metrics::OutcomeKind,
        testing::{Call, MemoryDirectory, RecordingMetrics},
    };

    fn eligible(name: &str) -> Instance {
        Instance::new(name, "workloads")
            .with_label("podchaosmonkey", "true")
            .with_phase(Phase::Running)
    }

    fn disruptor(dir: &Arc<MemoryDirectory>, metrics: &Arc<RecordingMetrics>) -> Disruptor {
        let handle: DirectoryHandle = dir.clone();
        Disruptor::new(handle, Policy::default())
            .with_metrics(metrics.clone())
            .with_rng(StdRng::seed_from_u64(42))
    }

    #[tokio::test]
    async fn terminates_one_eligible_instance() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![
            eligible("pod-0"),
            eligible("pod-1").with_label("podchaosmonkey", "false"),
            eligible("pod-2").with_finalizer("kubernetes"),
            eligible("pod-3"),
        ]));
        let metrics = Arc::new(RecordingMetrics::default());
        let mut d = disruptor(&dir, &metrics);

        let report = d.run_cycle().await;

        assert_eq!(report.observed, 4);
        assert_eq!(report.eligible, 2);
        let CycleOutcome::Terminated { name } = &report.outcome else {
            panic!("expected Terminated, got {:?}", report.outcome);
        };
        assert!(name == "pod-0" || name == "pod-3", "unexpected target {name}");

        assert_eq!(
            dir.calls(),
            vec![
                Call::List {
                    namespace: "workloads".into(),
                    timeout_secs: 5
                },
                Call::Get {
                    namespace: "workloads".into(),
                    name: name.clone()
                },
                Call::Delete {
                    namespace: "workloads".into(),
                    name: name.clone(),
                    grace_period_secs: 5
                },
            ]
        );
        assert_eq!(dir.remaining().len(), 3);
        assert_eq!(*metrics.cycles.lock().unwrap(), vec![OutcomeKind::Terminated]);
        assert_eq!(*metrics.observed.lock().unwrap(), vec![(4, 2)]);
        assert!(metrics.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn finalizer_opt_in_widens_the_target_set() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![
            eligible("guarded").with_finalizer("kubernetes"),
        ]));
        let handle: DirectoryHandle = dir.clone();
        let policy = Policy::default().with_include_finalizers(Flag::enabled());
        let mut d = Disruptor::new(handle, policy);

        let report = d.run_cycle().await;

        assert_eq!(
            report.outcome,
            CycleOutcome::Terminated {
                name: "guarded".into()
            }
        );
        assert_eq!(dir.deleted(), vec!["guarded".to_string()]);
    }

    #[tokio::test]
    async fn empty_eligible_set_issues_no_delete() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![
            eligible("pod-0").with_phase(Phase::Pending),
            eligible("pod-1").with_label("podchaosmonkey", "false"),
        ]));
        let metrics = Arc::new(RecordingMetrics::default());
        let mut d = disruptor(&dir, &metrics);

        let report = d.run_cycle().await;

        assert_eq!(report.outcome, CycleOutcome::NoEligibleTargets);
        assert_eq!((report.observed, report.eligible), (2, 0));
        assert_eq!(dir.calls().len(), 1, "only the list call is expected");
        assert!(dir.deleted().is_empty());
        assert_eq!(
            *metrics.cycles.lock().unwrap(),
            vec![OutcomeKind::NoEligibleTargets]
        );
    }

    #[tokio::test]
    async fn vanished_instance_aborts_without_delete() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![eligible("pod-0")]).vanishing());
        let metrics = Arc::new(RecordingMetrics::default());
        let mut d = disruptor(&dir, &metrics);

        let report = d.run_cycle().await;

        match &report.outcome {
            CycleOutcome::VerifyFailed { name, reason } => {
                assert_eq!(name, "pod-0");
                assert!(reason.contains("not found"), "unexpected reason: {reason}");
            }
            other => panic!("expected VerifyFailed, got {other:?}"),
        }
        assert!(dir.deleted().is_empty());
        assert_eq!(*metrics.errors.lock().unwrap(), vec![Operation::Get]);
    }

    #[tokio::test]
    async fn instance_that_stopped_running_is_spared() {
        let dir = Arc::new(
            MemoryDirectory::with_instances(vec![eligible("pod-0")]).phase_on_get(Phase::Succeeded),
        );
        let metrics = Arc::new(RecordingMetrics::default());
        let mut d = disruptor(&dir, &metrics);

        let report = d.run_cycle().await;

        assert_eq!(
            report.outcome,
            CycleOutcome::NoLongerEligible {
                name: "pod-0".into(),
                reason: "not_running".into()
            }
        );
        assert!(dir.deleted().is_empty());
        assert!(metrics.errors.lock().unwrap().is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    async fn logged_cycle(dir: MemoryDirectory) -> Vec<String> {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let dir = Arc::new(dir);
        let metrics = Arc::new(RecordingMetrics::default());
        disruptor(&dir, &metrics).run_cycle().await;
        out.lines()
    }

    #[tokio::test]
    async fn failed_cycles_log_at_warn() {
        let lines =
            logged_cycle(MemoryDirectory::with_instances(vec![eligible("pod-0")]).failing_delete())
                .await;

        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("WARN"), "{}", lines[0]);
        assert!(lines[0].contains("failed to delete instance"), "{}", lines[0]);
        assert!(lines[0].contains("pod-0"), "{}", lines[0]);
    }

    #[tokio::test]
    async fn completed_cycles_log_at_info() {
        for dir in [
            MemoryDirectory::with_instances(vec![eligible("pod-0")]),
            MemoryDirectory::with_instances(vec![]),
            MemoryDirectory::with_instances(vec![eligible("pod-0")]).phase_on_get(Phase::Failed),
        ] {
            let lines = logged_cycle(dir).await;
            assert_eq!(lines.len(), 1, "{lines:?}");
            assert!(lines[0].contains("INFO"), "{}", lines[0]);
        }
    }

    #[tokio::test]
    async fn list_failure_is_contained() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![eligible("pod-0")]).failing_list());
        let metrics = Arc::new(RecordingMetrics::default());
        let mut d = disruptor(&dir, &metrics);

        let report = d.run_cycle().await;

        assert!(matches!(report.outcome, CycleOutcome::ListFailed { .. }));
        assert_eq!((report.observed, report.eligible), (0, 0));
        assert_eq!(dir.calls().len(), 1);
        assert_eq!(*metrics.errors.lock().unwrap(), vec![Operation::List]);
        assert!(metrics.observed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_failure_is_contained() {
        let dir =
            Arc::new(MemoryDirectory::with_instances(vec![eligible("pod-0")]).failing_delete());
        let metrics = Arc::new(RecordingMetrics::default());
        let mut d = disruptor(&dir, &metrics);

        let report = d.run_cycle().await;

        assert!(matches!(
            &report.outcome,
            CycleOutcome::DeleteFailed { name, .. } if name == "pod-0"
        ));
        assert_eq!(dir.remaining(), vec!["pod-0".to_string()]);
        assert_eq!(*metrics.errors.lock().unwrap(), vec![Operation::Delete]);
        assert_eq!(*metrics.cycles.lock().unwrap(), vec![OutcomeKind::DeleteFailed]);
    }

    #[tokio::test]
    async fn disjoint_selector_never_deletes() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![
            eligible("pod-0"),
            eligible("pod-1"),
        ]));
        let handle: DirectoryHandle = dir.clone();
        let policy = Policy::default().with_selector(Selector::parse("team=payments").unwrap());
        let mut d = Disruptor::new(handle, policy);

        for _ in 0..5 {
            assert_eq!(d.run_cycle().await.outcome, CycleOutcome::NoEligibleTargets);
        }
        assert!(dir.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_sleeps_the_interval_between_cycles() {
        let dir = Arc::new(MemoryDirectory::with_instances(
            (0..5).map(|i| eligible(&format!("pod-{i}"))).collect(),
        ));
        let metrics = Arc::new(RecordingMetrics::default());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(disruptor(&dir, &metrics).run(cancel.clone()));

        // cycles at t=0s, 10s and 20s
        tokio::time::sleep(Duration::from_secs(25)).await;
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(dir.deleted().len(), 3);
        assert_eq!(dir.remaining().len(), 2);
        assert_eq!(metrics.cycles.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn run_survives_repeated_failures() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![eligible("pod-0")]).failing_list());
        let metrics = Arc::new(RecordingMetrics::default());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(disruptor(&dir, &metrics).run(cancel.clone()));

        // cycles at t=0s, 10s, 20s and 30s
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(!task.is_finished());
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(
            *metrics.cycles.lock().unwrap(),
            vec![OutcomeKind::ListFailed; 4]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_sleep() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![eligible("pod-0")]));
        let metrics = Arc::new(RecordingMetrics::default());
        let cancel = CancellationToken::new();
        let started = tokio::time::Instant::now();

        let task = tokio::spawn(disruptor(&dir, &metrics).run(cancel.clone()));
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        task.await.unwrap();

        assert!(started.elapsed() < Policy::default().interval());
        assert_eq!(metrics.cycles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_before_start_does_nothing() {
        let dir = Arc::new(MemoryDirectory::with_instances(vec![eligible("pod-0")]));
        let metrics = Arc::new(RecordingMetrics::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        disruptor(&dir, &metrics).run(cancel).await;

        assert!(dir.calls().is_empty());
    }
}
