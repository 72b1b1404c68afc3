//! Prometheus metrics endpoint.
//!
//! Renders the recorder's current snapshot, including the cart and checkout
//! counters incremented by the service layer (`carts_created_total`,
//! `checkouts_initiated_total`, `checkouts_completed_total`, ...).

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — Prometheus text exposition format.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
