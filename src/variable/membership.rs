//! Membership function shapes and evaluation
//!
//! Three representations:
//! - `Triangular`: breakpoints a <= b <= c, peak at b
//! - `Trapezoidal`: breakpoints a <= b <= c <= d, plateau on [b, c]
//! - `Sampled`: one degree per universe sample, interpolated in between
//!
//! Evaluation is defined for arbitrary real x, not just universe samples, with degree 0
//! outside a shape's support. Every result is clamped into [0, 1] so float overshoot on
//! ramp arithmetic never leaks out.

use crate::error::{FuzzError, FuzzResult};
use crate::variable::Universe;

/// A fuzzy set over one universe: maps a crisp value to a membership degree in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipFunction {
    /// Triangle rising on [a, b], falling on [b, c]
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoid rising on [a, b], flat on [b, c], falling on [c, d]
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Degrees aligned 1:1 with the owning universe's samples
    Sampled(Vec<f64>),
}

impl MembershipFunction {
    /// Triangle with peak at `b`
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        MembershipFunction::Triangular { a, b, c }
    }

    /// Trapezoid with plateau on `[b, c]`
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        MembershipFunction::Trapezoidal { a, b, c, d }
    }

    /// Arbitrary curve given as one degree per universe sample
    pub fn sampled(degrees: Vec<f64>) -> Self {
        MembershipFunction::Sampled(degrees)
    }

    /// Membership degree of `x`, in [0, 1].
    ///
    /// Degenerate ramps (equal breakpoints) collapse to steps: `Triangular(b, b, c)` is
    /// 1 exactly at b and falls on (b, c), never dividing by the zero-width ramp.
    pub fn degree_at(&self, x: f64, universe: &Universe) -> f64 {
        let deg = match self {
            MembershipFunction::Triangular { a, b, c } => {
                if x == *b {
                    1.0
                } else if x <= *a || x >= *c {
                    0.0
                } else if x < *b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x >= *b && x <= *c {
                    1.0
                } else if x <= *a || x >= *d {
                    0.0
                } else if x < *b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            MembershipFunction::Sampled(degrees) => {
                if degrees.is_empty() || !universe.contains(x) {
                    return 0.0;
                }
                let pos = (x - universe.min()) / universe.step();
                let i = (pos.floor() as usize).min(degrees.len() - 1);
                let j = (i + 1).min(degrees.len() - 1);
                let t = (pos - i as f64).clamp(0.0, 1.0);
                degrees[i] + (degrees[j] - degrees[i]) * t
            }
        };
        deg.clamp(0.0, 1.0)
    }

    /// Materialize the curve over every sample of `universe`
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe
            .samples()
            .iter()
            .map(|&x| self.degree_at(x, universe))
            .collect()
    }

    /// Structural checks run once at engine build time
    pub fn validate(&self, universe: &Universe) -> FuzzResult<()> {
        match self {
            MembershipFunction::Triangular { a, b, c } => {
                if ![a, b, c].iter().all(|v| v.is_finite()) {
                    return Err(FuzzError::invalid_engine(format!(
                        "triangular breakpoints must be finite (got {a}, {b}, {c})"
                    )));
                }
                if !(a <= b && b <= c) {
                    return Err(FuzzError::invalid_engine(format!(
                        "triangular breakpoints must satisfy a <= b <= c (got {a}, {b}, {c})"
                    )));
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if ![a, b, c, d].iter().all(|v| v.is_finite()) {
                    return Err(FuzzError::invalid_engine(format!(
                        "trapezoidal breakpoints must be finite (got {a}, {b}, {c}, {d})"
                    )));
                }
                if !(a <= b && b <= c && c <= d) {
                    return Err(FuzzError::invalid_engine(format!(
                        "trapezoidal breakpoints must satisfy a <= b <= c <= d (got {a}, {b}, {c}, {d})"
                    )));
                }
            }
            MembershipFunction::Sampled(degrees) => {
                if degrees.len() != universe.len() {
                    return Err(FuzzError::invalid_engine(format!(
                        "sampled curve has {} degrees but the universe has {} samples",
                        degrees.len(),
                        universe.len()
                    )));
                }
                for (i, &deg) in degrees.iter().enumerate() {
                    if !deg.is_finite() || !(0.0..=1.0).contains(&deg) {
                        return Err(FuzzError::invalid_engine(format!(
                            "sampled degree at index {i} is {deg}, outside [0, 1]"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
