//! HTTP handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use tracing::trace;

use borgmon_metrics::prometheus::CONTENT_TYPE;

use crate::ApiState;

/// GET <endpoint>
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let entries = state.gauges.snapshot().await;
    trace!(repos = entries.len(), "serving scrape");

    let body = borgmon_metrics::render_prometheus(&entries);
    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use borgmon_core::TransactionRecord;
    use borgmon_metrics::TransactionGauges;

    fn test_state() -> ApiState {
        ApiState {
            gauges: TransactionGauges::new(),
        }
    }

    #[tokio::test]
    async fn prometheus_endpoint_returns_text() {
        let state = test_state();
        let resp = prometheus_metrics(State(state)).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.contains("text/plain"));
        assert!(content_type.contains("version=0.0.4"));
    }

    #[tokio::test]
    async fn prometheus_endpoint_reflects_sink() {
        let state = test_state();
        state
            .gauges
            .record(
                "/srv/borg",
                &TransactionRecord {
                    sequence_number: 9,
                    timestamp: 99,
                },
            )
            .await;

        let resp = prometheus_metrics(State(state)).await.into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("borgbackup_last_transaction_number{repo=\"/srv/borg\"} 9"));
        assert!(text.contains("borgbackup_last_transaction_timestamp{repo=\"/srv/borg\"} 99"));
    }
}
