//! Error types for engine construction and inference
//!
//! Two failure classes share one enum:
//! - Build-time: `InvalidEngine`, raised once during validation, fatal for the engine
//! - Per-call: input and defuzzification errors, recoverable by the caller
//!
//! Per-call errors are returned, never logged and swallowed. A missing input or an
//! all-zero aggregate must reach the caller as a value, so "no applicable rule" stays
//! distinguishable from "computed a low output".

use thiserror::Error;

/// Result alias used across the crate
pub type FuzzResult<T> = Result<T, FuzzError>;

/// Errors produced while building an engine or running a simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzError {
    /// Structural or referential violation detected at engine build time
    #[error("invalid engine: {reason}")]
    InvalidEngine { reason: String },

    /// A name does not refer to any declared variable of the required role
    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    /// A premise leaf referenced a variable with no bound input value
    #[error("no input bound for variable: {name}")]
    UnboundVariable { name: String },

    /// An input value lies outside its variable's universe
    #[error("value {value} for '{variable}' is outside universe [{min}, {max}]")]
    OutOfUniverse {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Compute was invoked before every premise variable had an input
    #[error("missing inputs for: {}", variables.join(", "))]
    MissingInput { variables: Vec<String> },

    /// The aggregated curve for a consequent has zero mass, so no crisp value exists
    #[error("no rule fired for consequent: {variable}")]
    NoRuleFired { variable: String },

    /// An output was requested before a successful compute
    #[error("output '{variable}' not computed yet")]
    NotComputed { variable: String },
}

impl FuzzError {
    /// Shorthand for build-time validation failures
    pub fn invalid_engine(reason: impl Into<String>) -> Self {
        FuzzError::InvalidEngine { reason: reason.into() }
    }
}
