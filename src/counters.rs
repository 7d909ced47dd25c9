//! Cumulative runtime counters and the injectable source capability.
//! Used by: sampler, state, workload.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Slots in the circular pause-history ring. Pauses older than this many
/// GC cycles are overwritten and unrecoverable.
pub const PAUSE_SLOTS: usize = 256;

/// One consistent read of every cumulative counter, taken at a single
/// point in time. All counters are monotonically non-decreasing over the
/// process lifetime except the heap gauges, which move both ways.
#[derive(Debug, Clone)]
pub struct CounterSnapshot {
    pub runtime_version: String,
    pub os: String,
    pub arch: String,
    pub cpu_num: i64,
    pub thread_num: i64,
    pub sched_limit: i64,
    pub ffi_call_num: i64,

    pub alloc: u64,
    pub total_alloc: u64,
    pub sys: u64,
    pub lookups: u64,
    pub mallocs: u64,
    pub frees: u64,
    pub stack_inuse: u64,

    pub heap_alloc: u64,
    pub heap_sys: u64,
    pub heap_idle: u64,
    pub heap_inuse: u64,
    pub heap_released: u64,
    pub heap_objects: u64,

    pub gc_next: u64,
    pub gc_last: u64,
    pub gc_num: u32,
    pub pause_total_ns: u64,
    pub pause_ns: [u64; PAUSE_SLOTS],
}

impl Default for CounterSnapshot {
    fn default() -> Self {
        Self {
            runtime_version: String::new(),
            os: String::new(),
            arch: String::new(),
            cpu_num: 0,
            thread_num: 0,
            sched_limit: 0,
            ffi_call_num: 0,
            alloc: 0,
            total_alloc: 0,
            sys: 0,
            lookups: 0,
            mallocs: 0,
            frees: 0,
            stack_inuse: 0,
            heap_alloc: 0,
            heap_sys: 0,
            heap_idle: 0,
            heap_inuse: 0,
            heap_released: 0,
            heap_objects: 0,
            gc_next: 0,
            gc_last: 0,
            gc_num: 0,
            pause_total_ns: 0,
            pause_ns: [0; PAUSE_SLOTS],
        }
    }
}

/// Supplier of cumulative runtime counters. One call, one consistent
/// snapshot; reads never fail.
pub trait CounterSource: Send + Sync {
    fn read(&self) -> CounterSnapshot;
}

/// Ring index holding the i-th-most-recent completed pause.
///
/// The pause for GC cycle `n` lives in slot `(n - 1) % 256`, so the
/// i-th-most-recent (i = 0 is the latest) is `(gc_num + 255 - i) % 256`.
/// Computed in u64 so a `gc_num` near `u32::MAX` cannot overflow.
pub fn pause_slot(gc_num: u32, i: usize) -> usize {
    debug_assert!(i < PAUSE_SLOTS);
    ((gc_num as u64 + PAUSE_SLOTS as u64 - 1 - i as u64) % PAUSE_SLOTS as u64) as usize
}

/// Reference counter source for runtimes embedding this crate.
///
/// The embedder calls the `record_*` methods from its allocator and GC;
/// `read` produces a consistent snapshot under one lock. Environment
/// fields are captured once at construction.
pub struct RuntimeCounters {
    runtime_version: String,
    cpu_num: i64,
    inner: Mutex<Inner>,
}

struct Inner {
    thread_num: i64,
    ffi_call_num: i64,
    alloc: u64,
    total_alloc: u64,
    lookups: u64,
    mallocs: u64,
    frees: u64,
    stack_inuse: u64,
    heap_sys: u64,
    heap_released: u64,
    heap_objects: u64,
    gc_next: u64,
    gc_last: u64,
    gc_num: u32,
    pause_total_ns: u64,
    pause_ns: [u64; PAUSE_SLOTS],
}

impl RuntimeCounters {
    pub fn new(runtime_version: impl Into<String>) -> Arc<Self> {
        let cpu_num = std::thread::available_parallelism()
            .map(|n| n.get() as i64)
            .unwrap_or(1);

        Arc::new(Self {
            runtime_version: runtime_version.into(),
            cpu_num,
            inner: Mutex::new(Inner {
                thread_num: 1,
                ffi_call_num: 0,
                alloc: 0,
                total_alloc: 0,
                lookups: 0,
                mallocs: 0,
                frees: 0,
                stack_inuse: 0,
                heap_sys: 0,
                heap_released: 0,
                heap_objects: 0,
                gc_next: 0,
                gc_last: 0,
                gc_num: 0,
                pause_total_ns: 0,
                pause_ns: [0; PAUSE_SLOTS],
            }),
        })
    }

    /// One object of `bytes` allocated on the heap.
    pub fn record_alloc(&self, bytes: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.mallocs += 1;
        inner.total_alloc += bytes;
        inner.alloc += bytes;
        inner.heap_objects += 1;
        // sys never shrinks: track it as the high-water mark of the heap
        inner.heap_sys = inner.heap_sys.max(inner.alloc);
    }

    /// One object of `bytes` released back to the heap.
    pub fn record_free(&self, bytes: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.frees += 1;
        inner.alloc = inner.alloc.saturating_sub(bytes);
        inner.heap_objects = inner.heap_objects.saturating_sub(1);
    }

    /// A completed GC cycle that paused the runtime for `pause_ns`.
    pub fn record_gc(&self, pause_ns: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.gc_num = inner.gc_num.wrapping_add(1);
        let slot = pause_slot(inner.gc_num, 0);
        inner.pause_ns[slot] = pause_ns;
        inner.pause_total_ns += pause_ns;
        inner.gc_last = epoch_nanos();
        // doubling pacer: collect again once the live set doubles
        inner.gc_next = inner.alloc.saturating_mul(2);
    }

    pub fn record_lookup(&self) {
        self.inner.lock().unwrap().lookups += 1;
    }

    pub fn record_ffi_call(&self) {
        self.inner.lock().unwrap().ffi_call_num += 1;
    }

    pub fn set_threads(&self, n: i64) {
        self.inner.lock().unwrap().thread_num = n;
    }

    pub fn set_stack_inuse(&self, bytes: u64) {
        self.inner.lock().unwrap().stack_inuse = bytes;
    }
}

impl CounterSource for RuntimeCounters {
    fn read(&self) -> CounterSnapshot {
        let inner = self.inner.lock().unwrap();
        CounterSnapshot {
            runtime_version: self.runtime_version.clone(),
            os: std::env::consts::OS.to_owned(),
            arch: std::env::consts::ARCH.to_owned(),
            cpu_num: self.cpu_num,
            thread_num: inner.thread_num,
            sched_limit: self.cpu_num,
            ffi_call_num: inner.ffi_call_num,
            alloc: inner.alloc,
            total_alloc: inner.total_alloc,
            sys: inner.heap_sys + inner.stack_inuse,
            lookups: inner.lookups,
            mallocs: inner.mallocs,
            frees: inner.frees,
            stack_inuse: inner.stack_inuse,
            heap_alloc: inner.alloc,
            heap_sys: inner.heap_sys,
            heap_idle: inner.heap_sys.saturating_sub(inner.alloc),
            heap_inuse: inner.alloc,
            heap_released: inner.heap_released,
            heap_objects: inner.heap_objects,
            gc_next: inner.gc_next,
            gc_last: inner.gc_last,
            gc_num: inner.gc_num,
            pause_total_ns: inner.pause_total_ns,
            pause_ns: inner.pause_ns,
        }
    }
}

fn epoch_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
