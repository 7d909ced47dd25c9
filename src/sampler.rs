//! The stateful sampler: cumulative counters in, per-interval deltas out.
//! Used by: endpoint, state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::Utc;

use crate::counters::{pause_slot, CounterSource, PAUSE_SLOTS};
use crate::stats::Statistics;

const NANOS_PER_SEC: f64 = 1e9;

/// Baseline carried between samples. Only ever touched under the
/// sampler's lock.
struct SamplerState {
    last_sampled_at: Instant,
    last_pause_total_ns: u64,
    last_gc_num: u32,
}

/// Converts the source's cumulative counters into snapshot-plus-delta
/// statistics. Safe to share across request handlers.
pub struct Sampler {
    source: Arc<dyn CounterSource>,
    state: Mutex<SamplerState>,
}

impl Sampler {
    /// Takes one throwaway bootstrap sample so the first externally
    /// visible sample already computes against a valid baseline and
    /// reports zero rates instead of undefined ones.
    pub fn new(source: Arc<dyn CounterSource>) -> Self {
        let sampler = Self {
            source,
            state: Mutex::new(SamplerState {
                last_sampled_at: Instant::now(),
                last_pause_total_ns: 0,
                last_gc_num: 0,
            }),
        };
        sampler.sample();
        sampler
    }

    /// One snapshot-plus-delta against the previous call.
    ///
    /// Counter read, delta math and baseline update all happen under one
    /// lock, so concurrent callers are fully serialized: no two callers
    /// ever compute deltas from the same baseline, and summed GC counts
    /// across consecutive samples equal the total observed.
    pub fn sample(&self) -> Statistics {
        // nothing in the critical section panics, so a poisoned lock can
        // only come from a torn-down test thread; the baseline is still valid
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let c = self.source.read();
        let now = Instant::now();
        let wall = Utc::now();

        // Kept from upstream wire semantics: the raw pause-time delta in
        // seconds, not divided by elapsed wall time (see the field doc).
        // Zero until a baseline exists.
        let gc_pause_per_second = if state.last_pause_total_ns > 0 {
            c.pause_total_ns.saturating_sub(state.last_pause_total_ns) as f64 / NANOS_PER_SEC
        } else {
            0.0
        };

        // saturating: a decreasing counter clamps to an empty interval
        // instead of wrapping into a 4-billion-cycle extraction
        let gc_count = c.gc_num.saturating_sub(state.last_gc_num) as usize;

        let gc_per_second = if state.last_gc_num > 0 {
            per_second(
                gc_count as f64,
                now.duration_since(state.last_sampled_at).as_secs_f64(),
            )
        } else {
            0.0
        };

        // pauses older than one full ring have been overwritten and are
        // unrecoverable; newest first
        let take = gc_count.min(PAUSE_SLOTS);
        let mut gc_pause = Vec::with_capacity(take);
        for i in 0..take {
            gc_pause.push(c.pause_ns[pause_slot(c.gc_num, i)] as f64 / NANOS_PER_SEC);
        }

        state.last_sampled_at = now;
        state.last_pause_total_ns = c.pause_total_ns;
        state.last_gc_num = c.gc_num;
        drop(state);

        Statistics {
            timestamp: wall.timestamp(),
            runtime_version: c.runtime_version,
            os: c.os,
            arch: c.arch,
            cpu_num: c.cpu_num,
            thread_num: c.thread_num,
            sched_limit: c.sched_limit,
            ffi_call_num: c.ffi_call_num,
            memory_alloc: c.alloc,
            memory_total_alloc: c.total_alloc,
            memory_sys: c.sys,
            memory_lookups: c.lookups,
            memory_mallocs: c.mallocs,
            memory_frees: c.frees,
            stack_inuse: c.stack_inuse,
            heap_alloc: c.heap_alloc,
            heap_sys: c.heap_sys,
            heap_idle: c.heap_idle,
            heap_inuse: c.heap_inuse,
            heap_released: c.heap_released,
            heap_objects: c.heap_objects,
            gc_next: c.gc_next,
            gc_last: c.gc_last,
            gc_num: c.gc_num,
            gc_per_second,
            gc_pause_per_second,
            gc_pause,
        }
    }
}

/// Events per second of elapsed wall time. Defined as zero when no time
/// has elapsed: two samples inside the same clock tick report no rate
/// rather than infinity.
fn per_second(count: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        count / elapsed_secs
    } else {
        0.0
    }
}
