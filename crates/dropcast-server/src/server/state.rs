use dropcast_classifiers::Model;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state.
///
/// The model is read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifier
    pub model: Arc<dyn Model>,

    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(model: Arc<dyn Model>, config: ServerConfig) -> Self {
        Self {
            model,
            config: Arc::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
