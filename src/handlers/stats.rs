//! Statistics snapshot endpoint.
//! Used by: server.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::Result;
use crate::state::AppState;

pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.increment_requests();
    let body = state.stats.render()?;
    // content type travels with the body in a single response value, so
    // it cannot be dropped by being set after body bytes are written
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::{CounterSource, RuntimeCounters};
    use crate::endpoint::StatsEndpoint;
    use crate::error::Error;
    use crate::sampler::Sampler;
    use crate::state::{build_test_state, AppStateInner};
    use crate::stats::Statistics;
    use axum::http::StatusCode;
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn stats_returns_a_json_snapshot() {
        let state = build_test_state().unwrap();
        state.counters.set_threads(4);

        let response = stats(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_bytes(response).await;
        assert!(!body.is_empty());
        let decoded: Statistics = serde_json::from_slice(&body).unwrap();
        assert!(decoded.thread_num > 0);
        assert_eq!(decoded.runtime_version, "test-runtime 0.0.0");
    }

    fn broken_encoder(_out: &mut Vec<u8>, _stats: &Statistics) -> Result<()> {
        Err(Error::Encode(serde::ser::Error::custom("encoder always fails")))
    }

    #[tokio::test]
    async fn encoder_failure_maps_to_500_with_the_message() {
        let counters = RuntimeCounters::new("test-runtime 0.0.0");
        let source: Arc<dyn CounterSource> = counters.clone();
        let endpoint = StatsEndpoint::new(Sampler::new(source), Some(broken_encoder)).unwrap();
        let state = Arc::new(AppStateInner {
            counters,
            stats: endpoint,
            request_count: AtomicU64::new(0),
        });

        let response = stats(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_bytes(response).await;
        let text = String::from_utf8(body).unwrap();
        assert!(!text.is_empty());
        assert!(text.contains("encoder always fails"));
    }
}
