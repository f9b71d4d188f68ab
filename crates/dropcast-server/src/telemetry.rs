//! Logging and metrics setup

use dropcast_core::Outcome;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const PREDICTIONS_TOTAL: &str = "dropcast_predictions_total";
pub const ERRORS_TOTAL: &str = "dropcast_errors_total";
pub const PREDICT_LATENCY_US: &str = "dropcast_predict_latency_us";

/// Initialize tracing/logging
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dropcast=debug,dropcast_server=debug,dropcast_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("dropcast=info,dropcast_server=info,dropcast_classifiers=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(PREDICTIONS_TOTAL, "Total number of predictions by outcome");
    metrics::describe_counter!(ERRORS_TOTAL, "Total number of failed predictions by error kind");
    metrics::describe_histogram!(
        PREDICT_LATENCY_US,
        metrics::Unit::Microseconds,
        "Prediction latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

pub fn record_prediction(outcome: Outcome, latency_us: u64) {
    metrics::counter!(PREDICTIONS_TOTAL, "outcome" => outcome.name()).increment(1);
    metrics::histogram!(PREDICT_LATENCY_US).record(latency_us as f64);
}

pub fn record_error(kind: &'static str) {
    metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
}
