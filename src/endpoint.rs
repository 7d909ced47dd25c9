//! Bridges the sampler to the transport: sample, then encode.
//! Used by: handlers, state.

use crate::encode::EncoderFn;
use crate::error::{Error, Result};
use crate::sampler::Sampler;
use crate::stats::Statistics;

/// Pairs the sampler with the injected encoder. The encoder is required
/// at construction: a missing capability fails here, once, instead of on
/// every request.
pub struct StatsEndpoint {
    sampler: Sampler,
    encode: EncoderFn,
}

impl StatsEndpoint {
    pub fn new(sampler: Sampler, encode: Option<EncoderFn>) -> Result<Self> {
        let encode = encode.ok_or(Error::MissingEncoder)?;
        Ok(Self { sampler, encode })
    }

    /// Take one sample and encode it into a response body.
    ///
    /// Sampling completes (and the baseline advances) before encoding is
    /// attempted, so an encoder failure never corrupts sampler state.
    pub fn render(&self) -> Result<Vec<u8>> {
        let stats = self.sampler.sample();
        let mut body = Vec::with_capacity(1024);
        (self.encode)(&mut body, &stats)?;
        Ok(body)
    }

    pub fn sample(&self) -> Statistics {
        self.sampler.sample()
    }
}
