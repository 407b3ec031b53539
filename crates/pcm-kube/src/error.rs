use std::path::PathBuf;

use thiserror::Error;

use pcm_core::DirectoryError;

/// Failure to build a cluster client at startup.
#[derive(Debug, Error)]
pub enum KubeError {
    #[error("failed to load kubeconfig {path}: {reason}")]
    Kubeconfig { path: PathBuf, reason: String },

    #[error("in-cluster configuration unavailable: {0}")]
    InCluster(String),

    #[error("failed to build cluster client: {0}")]
    Client(String),
}

/// Map a client error onto the directory taxonomy.
///
/// `name` is the object addressed by the request, if any; a 404 on a named object is
/// [`DirectoryError::NotFound`], a 404 on a list means the namespace itself is missing.
pub(crate) fn classify(err: kube::Error, namespace: &str, name: Option<&str>) -> DirectoryError {
    match err {
        kube::Error::Api(resp) => match (resp.code, name) {
            (404, Some(name)) => DirectoryError::not_found(namespace, name),
            (408 | 504, _) => DirectoryError::Timeout(resp.message),
            (429, _) | (500..=599, _) => DirectoryError::Unavailable(format!(
                "{} ({}): {}",
                resp.reason, resp.code, resp.message
            )),
            _ => DirectoryError::Rejected(format!(
                "{} ({}): {}",
                resp.reason, resp.code, resp.message
            )),
        },
        kube::Error::SerdeError(e) => DirectoryError::Malformed(e.to_string()),
        other => DirectoryError::Unavailable(other.to_string()),
    }
}
