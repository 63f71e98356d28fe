//! Defuzzification of aggregated output curves
//!
//! All methods operate on a curve sampled over a consequent's universe. An all-zero
//! curve has no defuzzifiable mass under any method; that case is reported as `None`
//! here and surfaced as `NoRuleFired` by the simulation.

/// Strategy for collapsing an aggregated curve to one crisp value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefuzzMethod {
    /// Center of area: Σ(y·μ) / Σμ
    Centroid,
    /// Sample splitting the curve's area in half
    Bisector,
    /// Mean of the samples at maximum membership
    MeanOfMax,
    /// Smallest sample at maximum membership
    SmallestOfMax,
    /// Largest sample at maximum membership
    LargestOfMax,
}

impl Default for DefuzzMethod {
    fn default() -> Self {
        DefuzzMethod::Centroid
    }
}

impl DefuzzMethod {
    /// Stable lowercase name, as written in definition files
    pub fn name(&self) -> &'static str {
        match self {
            DefuzzMethod::Centroid => "centroid",
            DefuzzMethod::Bisector => "bisector",
            DefuzzMethod::MeanOfMax => "mean_of_max",
            DefuzzMethod::SmallestOfMax => "smallest_of_max",
            DefuzzMethod::LargestOfMax => "largest_of_max",
        }
    }

    /// Inverse of [`DefuzzMethod::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "centroid" => Some(DefuzzMethod::Centroid),
            "bisector" => Some(DefuzzMethod::Bisector),
            "mean_of_max" => Some(DefuzzMethod::MeanOfMax),
            "smallest_of_max" => Some(DefuzzMethod::SmallestOfMax),
            "largest_of_max" => Some(DefuzzMethod::LargestOfMax),
            _ => None,
        }
    }

    /// Collapse `degrees` over `samples`; `None` when the curve has zero mass
    pub(crate) fn apply(&self, samples: &[f64], degrees: &[f64]) -> Option<f64> {
        let mass: f64 = degrees.iter().sum();
        if mass <= 0.0 {
            return None;
        }

        match self {
            DefuzzMethod::Centroid => {
                let weighted: f64 = samples
                    .iter()
                    .zip(degrees)
                    .map(|(&y, &deg)| y * deg)
                    .sum();
                Some(weighted / mass)
            }
            DefuzzMethod::Bisector => {
                let half = mass / 2.0;
                let mut cumulative = 0.0;
                for (&y, &deg) in samples.iter().zip(degrees) {
                    cumulative += deg;
                    if cumulative >= half {
                        return Some(y);
                    }
                }
                samples.last().copied()
            }
            DefuzzMethod::MeanOfMax => {
                let max = degrees.iter().cloned().fold(0.0, f64::max);
                let at_max: Vec<f64> = samples
                    .iter()
                    .zip(degrees)
                    .filter(|(_, &deg)| (deg - max).abs() <= f64::EPSILON)
                    .map(|(&y, _)| y)
                    .collect();
                Some(at_max.iter().sum::<f64>() / at_max.len() as f64)
            }
            DefuzzMethod::SmallestOfMax => {
                let max = degrees.iter().cloned().fold(0.0, f64::max);
                samples
                    .iter()
                    .zip(degrees)
                    .find(|(_, &deg)| (deg - max).abs() <= f64::EPSILON)
                    .map(|(&y, _)| y)
            }
            DefuzzMethod::LargestOfMax => {
                let max = degrees.iter().cloned().fold(0.0, f64::max);
                samples
                    .iter()
                    .zip(degrees)
                    .rev()
                    .find(|(_, &deg)| (deg - max).abs() <= f64::EPSILON)
                    .map(|(&y, _)| y)
            }
        }
    }
}
