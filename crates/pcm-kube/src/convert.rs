use k8s_openapi::api::core::v1::Pod;

use pcm_core::DirectoryError;
use pcm_model::{Instance, Labels, Phase};

/// Project a pod onto the fields eligibility looks at.
///
/// The namespace falls back to `namespace` when the object omits it.
pub(crate) fn instance_from_pod(pod: Pod, namespace: &str) -> Result<Instance, DirectoryError> {
    let meta = pod.metadata;
    let name = meta
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| DirectoryError::Malformed(format!("pod in {namespace} has no name")))?;

    let phase = Phase::from_status(pod.status.as_ref().and_then(|s| s.phase.as_deref()));
    let labels: Labels = meta.labels.unwrap_or_default().into();

    let mut inst = Instance::new(name, meta.namespace.unwrap_or_else(|| namespace.to_string()))
        .with_labels(labels)
        .with_phase(phase);
    inst.finalizers = meta.finalizers.unwrap_or_default();
    Ok(inst)
}
