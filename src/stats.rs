//! The statistics snapshot shipped on the wire.
//! Used by: sampler, encode, endpoint.

use serde::{Deserialize, Serialize};

/// One point-in-time snapshot of runtime memory and GC state, plus the
/// rates derived against the previous sample.
///
/// Field names on the wire follow the gosh JSON schema bit-for-bit
/// (`go_version`, `goroutine_num`, ...) so existing dashboards keep
/// working; the Rust-side names stay runtime-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Seconds since the Unix epoch at sampling time.
    pub timestamp: i64,
    #[serde(rename = "go_version")]
    pub runtime_version: String,
    #[serde(rename = "go_os")]
    pub os: String,
    #[serde(rename = "go_arch")]
    pub arch: String,
    pub cpu_num: i64,
    #[serde(rename = "goroutine_num")]
    pub thread_num: i64,
    #[serde(rename = "gomaxprocs")]
    pub sched_limit: i64,
    #[serde(rename = "cgo_call_num")]
    pub ffi_call_num: i64,
    pub memory_alloc: u64,
    pub memory_total_alloc: u64,
    pub memory_sys: u64,
    pub memory_lookups: u64,
    pub memory_mallocs: u64,
    pub memory_frees: u64,
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
    /// GC cycles per second of wall time since the previous sample.
    pub gc_per_second: f64,
    /// Cumulative pause time accrued since the previous sample, in
    /// seconds. Upstream quirk kept for wire compatibility: despite the
    /// name this is a raw interval delta, not divided by elapsed time.
    pub gc_pause_per_second: f64,
    /// Individual pause durations (seconds) since the previous sample,
    /// most recent first, at most 256 entries.
    pub gc_pause: Vec<f64>,
}
