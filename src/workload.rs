//! Synthetic runtime workload for the standalone demo binary.
//! Used by: main.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::counters::RuntimeCounters;

const TICK: Duration = Duration::from_millis(50);
/// One GC cycle roughly every 400 ms of workload.
const GC_EVERY_TICKS: u32 = 8;

/// Drives a counter handle with jittered allocations, frees and periodic
/// GC cycles so the demo binary serves moving numbers instead of zeros.
pub fn spawn(counters: Arc<RuntimeCounters>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut live: Vec<u64> = Vec::new();
        let mut ticks: u32 = 0;

        loop {
            tokio::time::sleep(TICK).await;
            ticks = ticks.wrapping_add(1);
            let mut rng = rand::thread_rng();

            for _ in 0..rng.gen_range(4..32) {
                let bytes = rng.gen_range(64..8192);
                counters.record_alloc(bytes);
                live.push(bytes);
                if rng.gen_ratio(1, 16) {
                    counters.record_lookup();
                }
            }
            if rng.gen_ratio(1, 4) {
                counters.record_ffi_call();
            }

            if ticks % GC_EVERY_TICKS == 0 {
                // collect roughly half the live set and charge a pause
                let keep = live.len() / 2;
                for bytes in live.drain(keep..) {
                    counters.record_free(bytes);
                }
                counters.record_gc(rng.gen_range(50_000..2_000_000));
                counters.set_stack_inuse(live.len() as u64 * 1024);
            }
        }
    })
}
