//! Kubernetes-backed workload directory: instances are pods in one namespace.
mod client;
mod convert;
mod directory;
mod error;

pub use client::connect;
pub use directory::KubeDirectory;
pub use error::KubeError;
