use std::path::Path;

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::info;

use crate::error::KubeError;

/// Build a cluster client.
///
/// With a kubeconfig path, its current context is used; otherwise the pod's
/// service-account configuration is.
pub async fn connect(kubeconfig: Option<&Path>) -> Result<Client, KubeError> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig_err = |reason: String| KubeError::Kubeconfig {
                path: path.to_path_buf(),
                reason,
            };
            let kc = Kubeconfig::read_from(path).map_err(|e| kubeconfig_err(e.to_string()))?;
            let config = Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default())
                .await
                .map_err(|e| kubeconfig_err(e.to_string()))?;
            info!(path = %path.display(), cluster = %config.cluster_url, "using kubeconfig");
            config
        }
        None => {
            let config = Config::incluster().map_err(|e| KubeError::InCluster(e.to_string()))?;
            info!(cluster = %config.cluster_url, "using in-cluster configuration");
            config
        }
    };

    Client::try_from(config).map_err(|e| KubeError::Client(e.to_string()))
}
