use std::env;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::runtime::Handle;
use tracing::{info, warn};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const PREDICTIONS_TOTAL: &str = "ss_predictions_total";
pub const WORKER_SCORING_FAILURES_TOTAL: &str = "ss_worker_scoring_failures_total";

/// Start a Prometheus exporter on `0.0.0.0:<port>`, where the port comes from
/// `port_env` or falls back to `default_port`.
///
/// Installs the global recorder and spawns the HTTP listener onto the current
/// Tokio runtime. Returns `None` outside a runtime or when either step fails.
/// A second call returns the handle from the first.
pub fn init_metrics(port_env: &str, default_port: u16) -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    let port = env::var(port_env)
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(default_port);

    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(err) => {
            warn!(error = %err, metrics_port = port, "prometheus exporter needs a tokio runtime");
            return None;
        }
    };

    let (recorder, exporter) = match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .build()
    {
        Ok(parts) => parts,
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to build prometheus exporter");
            return None;
        }
    };

    let handle = recorder.handle();
    if let Err(err) = metrics::set_global_recorder(recorder) {
        warn!(error = %err, "metrics recorder already installed");
        return None;
    }

    runtime.spawn(async move {
        if let Err(err) = exporter.await {
            warn!(error = ?err, "prometheus exporter stopped");
        }
    });

    let _ = PROMETHEUS_HANDLE.set(handle);
    info!(metrics_port = port, "started prometheus exporter");
    PROMETHEUS_HANDLE.get()
}

/// Count one successful prediction response for `endpoint`.
pub fn record_prediction(endpoint: &'static str) {
    metrics::counter!(PREDICTIONS_TOTAL, "endpoint" => endpoint).increment(1);
}

/// Count workers that fell back or were skipped because scoring failed.
pub fn record_worker_failure(endpoint: &'static str, failed: usize) {
    if failed == 0 {
        return;
    }
    metrics::counter!(WORKER_SCORING_FAILURES_TOTAL, "endpoint" => endpoint).increment(failed as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_exporter_is_a_no_op() {
        record_prediction("/api/predict/performance");
        record_worker_failure("/api/predict/batch-suitability", 2);
        record_worker_failure("/api/predict/batch-suitability", 0);
        assert!(PROMETHEUS_HANDLE.get().is_none());
    }
}
