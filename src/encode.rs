//! The pluggable output-encoding capability.
//! Used by: endpoint, state.

use crate::error::Result;
use crate::stats::Statistics;

/// Serializes one statistics value into the response buffer. Injected
/// into the endpoint at construction; a plain fn pointer, so swapping
/// the wire format costs no dispatch and no allocation.
pub type EncoderFn = fn(&mut Vec<u8>, &Statistics) -> Result<()>;

/// Default capability: compact JSON via serde_json.
pub fn json_encoder(out: &mut Vec<u8>, stats: &Statistics) -> Result<()> {
    serde_json::to_writer(&mut *out, stats)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_encoder_emits_a_decodable_object() {
        let stats = Statistics {
            timestamp: 1,
            runtime_version: "toyvm".into(),
            os: "linux".into(),
            arch: "x86_64".into(),
            cpu_num: 1,
            thread_num: 1,
            sched_limit: 1,
            ffi_call_num: 0,
            memory_alloc: 0,
            memory_total_alloc: 0,
            memory_sys: 0,
            memory_lookups: 0,
            memory_mallocs: 0,
            memory_frees: 0,
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
            gc_per_second: 0.0,
            gc_pause_per_second: 0.0,
            gc_pause: Vec::new(),
        };

        let mut out = Vec::new();
        json_encoder(&mut out, &stats).unwrap();
        let decoded: Statistics = serde_json::from_slice(&out).unwrap();
        assert_eq!(decoded, stats);
    }
}
