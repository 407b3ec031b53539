//! Prometheus backend for the disruptor's [`pcm_core::MetricsBackend`] seam.
//!
//! ## Metrics
//! - `pcm_cycles_total{outcome}` - Counter
//! - `pcm_instances_observed` - Gauge
//! - `pcm_instances_eligible` - Gauge
//! - `pcm_directory_errors_total{operation}` - Counter
//!
//! This crate does not serve HTTP; the agent exposes [`PrometheusMetrics::encode_text`]
//! on its own `/metrics` route.
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
