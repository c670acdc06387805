//! Uniform random sources for the epidemic trials.
//!
//! Every stochastic decision in a tick (recovery, transmission, reseeding)
//! draws one sample from a single [`UniformSource`]. Any `rand` generator
//! works out of the box; [`FixedSample`] and [`SampleSequence`] replay known
//! values so a tick can be reproduced exactly.
//!
//! ```ignore
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let next = epidemic::step(&params, &state, &graph, &mut rng)?;
//! ```

use rand::{Rng, RngCore};

/// A source of uniform samples in `[0, 1)`.
pub trait UniformSource {
    /// Draw the next sample.
    fn uniform(&mut self) -> f32;
}

impl<R: RngCore> UniformSource for R {
    #[inline]
    fn uniform(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Returns the same value on every draw.
///
/// Handy for forcing every trial in a tick the same way: a value of `0.0`
/// passes every "less than p" test with `p > 0`, while a value close to `1.0`
/// fails them all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSample(pub f32);

impl UniformSource for FixedSample {
    #[inline]
    fn uniform(&mut self) -> f32 {
        self.0
    }
}

/// Replays a list of samples in order, wrapping around at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSequence {
    samples: Vec<f32>,
    cursor: usize,
}

impl SampleSequence {
    /// Create a sequence. An empty list behaves like `FixedSample(0.0)`.
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Rewind to the first sample.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Number of samples drawn since creation or the last reset.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for SampleSequence {
    fn uniform(&mut self) -> f32 {
        if self.samples.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        value
    }
}
