mod config;
mod metrics_server;
mod shutdown;

use std::sync::Arc;

use envconfig::Envconfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use pcm_core::{DirectoryHandle, Disruptor};
use pcm_kube::KubeDirectory;
use pcm_observe::{LogTimeZone, init_local_offset, init_logger};
use pcm_prometheus::PrometheusMetrics;

use crate::config::AgentConfig;

fn main() -> anyhow::Result<()> {
    let cfg = AgentConfig::init_from_env()?;

    // 1) logger; the local offset must be captured before any thread exists
    let logger = cfg.logger_config()?;
    if logger.tz == LogTimeZone::Local {
        init_local_offset();
    }
    init_logger(&logger)?;

    // 2) runtime
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    // 3) policy, rejected before touching the cluster
    let policy = cfg.policy()?;
    let metrics_addr = cfg.metrics_addr()?;

    // 4) directory
    let client = pcm_kube::connect(cfg.credentials_path().as_deref()).await?;
    let directory: DirectoryHandle = Arc::new(KubeDirectory::new(client));

    let cancel = CancellationToken::new();
    shutdown::cancel_on_signal(cancel.clone());

    // 5) metrics
    let mut disruptor = Disruptor::new(directory, policy);
    let server = match metrics_addr {
        Some(addr) => {
            let metrics = PrometheusMetrics::new()?;
            disruptor = disruptor.with_metrics(Arc::new(metrics.clone()));
            let listener = TcpListener::bind(addr).await?;
            Some(tokio::spawn(metrics_server::serve(
                listener,
                metrics,
                cancel.clone(),
            )))
        }
        None => None,
    };

    // 6) loop until SIGINT/SIGTERM
    disruptor.run(cancel.clone()).await;

    if let Some(server) = server {
        cancel.cancel();
        if let Err(e) = server.await? {
            error!(error = %e, "metrics endpoint failed");
        }
    }
    info!("agent stopped");
    Ok(())
}
