//! Prometheus metrics for the webhook.
//!
//! A single histogram family tracks authentication latency, labeled by the
//! HTTP status code that was written. [`RequestTimer`] guarantees exactly one
//! observation per request: it records on drop, so early returns and panic
//! unwinds are metered too.

use axum::http::StatusCode;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabel, EncodeLabelSet, LabelSetEncoder};
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Status code label for latency observations.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct CodeLabels {
    pub code: String,
}

impl EncodeLabelSet for CodeLabels {
    fn encode(&self, mut encoder: LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("code", self.code.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

pub struct Metrics {
    authenticate_duration_seconds: Family<CodeLabels, Histogram>,
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let authenticate_duration_seconds =
            Family::<CodeLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.001, 2.0, 15))
            });
        registry.register(
            "guardia_authenticate_duration_seconds",
            "Duration of token review requests in seconds",
            authenticate_duration_seconds.clone(),
        );

        Self {
            authenticate_duration_seconds,
            registry,
        }
    }

    /// Record one latency observation under the given status code.
    pub fn observe(&self, code: StatusCode, seconds: f64) {
        let labels = CodeLabels {
            code: code.as_u16().to_string(),
        };
        self.authenticate_duration_seconds
            .get_or_create(&labels)
            .observe(seconds);
    }

    /// Start timing a request. The observation is emitted when the returned
    /// guard is dropped.
    #[must_use]
    pub fn start_timer(self: &Arc<Self>) -> RequestTimer {
        RequestTimer {
            metrics: Arc::clone(self),
            start: Instant::now(),
            code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Encode the registry to Prometheus text format.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}

/// Drop guard timing one request.
///
/// The status defaults to 500 so a handler that unwinds before choosing a
/// response still shows up in the histogram.
pub struct RequestTimer {
    metrics: Arc<Metrics>,
    start: Instant,
    code: StatusCode,
}

impl RequestTimer {
    pub fn set_status(&mut self, code: StatusCode) {
        self.code = code;
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.metrics
            .observe(self.code, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_records_under_code_label() {
        let metrics = Metrics::new();
        metrics.observe(StatusCode::OK, 0.01);
        metrics.observe(StatusCode::UNAUTHORIZED, 0.02);
        metrics.observe(StatusCode::UNAUTHORIZED, 0.03);

        let encoded = metrics.encode();
        assert!(encoded.contains("guardia_authenticate_duration_seconds_count{code=\"200\"} 1"));
        assert!(encoded.contains("guardia_authenticate_duration_seconds_count{code=\"401\"} 2"));
    }

    #[test]
    fn timer_records_on_drop() {
        let metrics = Arc::new(Metrics::new());

        {
            let mut timer = metrics.start_timer();
            timer.set_status(StatusCode::UNAUTHORIZED);
        }

        let encoded = metrics.encode();
        assert!(encoded.contains("guardia_authenticate_duration_seconds_count{code=\"401\"} 1"));
    }

    #[test]
    fn timer_without_status_records_500() {
        let metrics = Arc::new(Metrics::new());

        drop(metrics.start_timer());

        let encoded = metrics.encode();
        assert!(encoded.contains("guardia_authenticate_duration_seconds_count{code=\"500\"} 1"));
    }
}
