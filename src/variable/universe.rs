//! Discretized sampling domain for membership functions

use crate::error::{FuzzError, FuzzResult};

/// An ordered, fixed-step discretization of a real interval.
///
/// The universe is the sampling domain every membership curve of one variable is
/// aligned with. Samples are strictly increasing and at least two points long. The
/// effective upper bound is the last generated sample, which equals the requested
/// `max` whenever `max - min` is a multiple of `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    samples: Vec<f64>,
    step: f64,
}

impl Universe {
    /// Build a universe covering `[min, max]` sampled every `step`.
    pub fn range(min: f64, max: f64, step: f64) -> FuzzResult<Self> {
        if !min.is_finite() || !max.is_finite() || !step.is_finite() {
            return Err(FuzzError::invalid_engine(format!(
                "universe bounds must be finite (got min={min}, max={max}, step={step})"
            )));
        }
        if step <= 0.0 {
            return Err(FuzzError::invalid_engine(format!(
                "universe step must be positive (got {step})"
            )));
        }
        if min >= max {
            return Err(FuzzError::invalid_engine(format!(
                "universe requires min < max (got [{min}, {max}])"
            )));
        }

        // Small relative slack so e.g. (0.3 - 0.0) / 0.1 still yields 4 samples.
        let span = (max - min) / step;
        let count = (span + span.abs() * 1e-9 + 1e-12).floor() as usize + 1;
        if count < 2 {
            return Err(FuzzError::invalid_engine(format!(
                "universe [{min}, {max}] with step {step} has fewer than 2 samples"
            )));
        }

        // Multiply rather than accumulate, so long universes do not drift.
        let samples = (0..count).map(|i| min + i as f64 * step).collect();
        Ok(Universe { samples, step })
    }

    /// Sample points in increasing order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Lower bound (first sample)
    pub fn min(&self) -> f64 {
        self.samples[0]
    }

    /// Upper bound (last sample)
    pub fn max(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }

    /// Distance between adjacent samples
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of sample points
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a valid universe; present for slice-like completeness
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether `x` lies within the sampled interval
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min() && x <= self.max()
    }

    /// Clamp `x` into the sampled interval
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min(), self.max())
    }
}
