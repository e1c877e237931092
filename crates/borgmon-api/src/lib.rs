//! borgmon-api — HTTP surface for the borgmon exporter.
//!
//! Serves the gauge sink in Prometheus text format on a configurable path
//! (`/metrics` by default). Every other path is a 404.

pub mod handlers;

use axum::routing::get;
use axum::Router;
use borgmon_metrics::TransactionGauges;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub gauges: TransactionGauges,
}

/// Build the router serving the exposition on `endpoint`.
pub fn build_router(gauges: TransactionGauges, endpoint: &str) -> Router {
    let state = ApiState { gauges };

    Router::new()
        .route(endpoint, get(handlers::prometheus_metrics))
        .with_state(state)
}
