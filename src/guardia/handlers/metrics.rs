use crate::guardia::metrics::Metrics;
use axum::{extract::Extension, response::IntoResponse};
use std::sync::Arc;

/// Prometheus text exposition endpoint.
pub async fn metrics(Extension(metrics): Extension<Arc<Metrics>>) -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics.encode(),
    )
}
