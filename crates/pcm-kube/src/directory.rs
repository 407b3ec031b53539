use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client,
    api::{DeleteParams, ListParams},
};
use tracing::{debug, warn};

use pcm_core::{DirectoryError, DirectoryResult, WorkloadDirectory};
use pcm_model::Instance;

use crate::{convert::instance_from_pod, error::classify};

/// [`WorkloadDirectory`] over the core/v1 pods API.
#[derive(Clone)]
pub struct KubeDirectory {
    client: Client,
}

impl KubeDirectory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// List parameters for one cycle; a zero timeout means no deadline.
pub(crate) fn list_params(timeout_secs: u32) -> ListParams {
    match timeout_secs {
        0 => ListParams::default(),
        secs => ListParams::default().timeout(secs),
    }
}

pub(crate) fn delete_params(grace_period_secs: u32) -> DeleteParams {
    DeleteParams {
        grace_period_seconds: Some(grace_period_secs),
        ..DeleteParams::default()
    }
}

/// Convert listed pods, dropping the ones that cannot be addressed by name.
pub(crate) fn instances_from(pods: Vec<Pod>, namespace: &str) -> Vec<Instance> {
    pods.into_iter()
        .filter_map(|pod| match instance_from_pod(pod, namespace) {
            Ok(inst) => Some(inst),
            Err(e) => {
                warn!(namespace, error = %e, "skipping pod");
                None
            }
        })
        .collect()
}

#[async_trait]
impl WorkloadDirectory for KubeDirectory {
    async fn list_instances(
        &self,
        namespace: &str,
        timeout_secs: u32,
    ) -> DirectoryResult<Vec<Instance>> {
        let params = list_params(timeout_secs);
        let api = self.pods(namespace);
        let request = api.list(&params);
        let listed = match params.timeout {
            None => request.await,
            Some(secs) => tokio::time::timeout(Duration::from_secs(u64::from(secs)), request)
                .await
                .map_err(|_| {
                    DirectoryError::Timeout(format!("listing {namespace} took over {secs}s"))
                })?,
        };
        let pods = listed.map_err(|e| classify(e, namespace, None))?;

        let instances = instances_from(pods.items, namespace);
        debug!(namespace, count = instances.len(), "pods listed");
        Ok(instances)
    }

    async fn get_instance(&self, namespace: &str, name: &str) -> DirectoryResult<Instance> {
        let pod = self
            .pods(namespace)
            .get(name)
            .await
            .map_err(|e| classify(e, namespace, Some(name)))?;
        instance_from_pod(pod, namespace)
    }

    async fn delete_instance(
        &self,
        namespace: &str,
        name: &str,
        grace_period_secs: u32,
    ) -> DirectoryResult<()> {
        self.pods(namespace)
            .delete(name, &delete_params(grace_period_secs))
            .await
            .map(|_| ())
            .map_err(|e| classify(e, namespace, Some(name)))
    }
}
