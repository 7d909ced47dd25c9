//! Shared application state.

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::sync::Arc;

use crate::counters::{CounterSource, RuntimeCounters};
use crate::encode::json_encoder;
use crate::endpoint::StatsEndpoint;
use crate::error::Result;
use crate::sampler::Sampler;

pub struct AppStateInner {
    /// Write side: the embedding runtime (or the demo workload) feeds
    /// counters through this handle.
    pub counters: Arc<RuntimeCounters>,
    /// Read side: sampler plus encoder behind the /stats route.
    pub stats: StatsEndpoint,
    pub request_count: AtomicU64,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    pub fn increment_requests(&self) {
        let n = self.request_count.fetch_add(1, Relaxed) + 1;
        if n % 1000 == 0 {
            tracing::info!(count = n, "stats requests served");
        }
    }
}

pub fn build_state(runtime_version: &str) -> Result<AppState> {
    let counters = RuntimeCounters::new(runtime_version);
    let source: Arc<dyn CounterSource> = counters.clone();
    let sampler = Sampler::new(source);
    let stats = StatsEndpoint::new(sampler, Some(json_encoder))?;

    Ok(Arc::new(AppStateInner {
        counters,
        stats,
        request_count: AtomicU64::new(0),
    }))
}

pub fn build_test_state() -> Result<AppState> {
    build_state("test-runtime 0.0.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_builds_with_the_default_encoder() -> Result<()> {
        let state = build_test_state()?;
        assert!(!state.stats.render()?.is_empty());
        Ok(())
    }

    #[test]
    fn state_counters_feed_the_sampler() -> Result<()> {
        let state = build_test_state()?;
        state.counters.record_gc(1_000_000);
        let s = state.stats.sample();
        assert_eq!(s.gc_num, 1);
        assert_eq!(s.gc_pause, vec![0.001]);
        Ok(())
    }
}
