//! Workload directory abstraction consumed by the disruptor.
//!
//! The directory is the authority on instances: the core lists them, re-fetches one by
//! name and asks for its deletion. Concrete backends (Kubernetes, in-memory fakes) implement
//! [`WorkloadDirectory`] and are injected as a [`DirectoryHandle`].
mod error;
pub use error::{DirectoryError, DirectoryResult};

use std::sync::Arc;

use async_trait::async_trait;
use pcm_model::Instance;

/// Remote collection of instances, addressed by namespace and name.
#[async_trait]
pub trait WorkloadDirectory: Send + Sync {
    /// List every instance currently present in `namespace`.
    ///
    /// `timeout_secs` bounds the request on the server side.
    async fn list_instances(
        &self,
        namespace: &str,
        timeout_secs: u32,
    ) -> DirectoryResult<Vec<Instance>>;

    /// Fetch a single instance.
    ///
    /// Returns [`DirectoryError::NotFound`] when it no longer exists.
    async fn get_instance(&self, namespace: &str, name: &str) -> DirectoryResult<Instance>;

    /// Request deletion, granting `grace_period_secs` for orderly shutdown.
    async fn delete_instance(
        &self,
        namespace: &str,
        name: &str,
        grace_period_secs: u32,
    ) -> DirectoryResult<()>;
}

/// Shared handle to a directory backend.
pub type DirectoryHandle = Arc<dyn WorkloadDirectory>;
