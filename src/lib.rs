//! fuzzctl - Mamdani Fuzzy Inference
//!
//! A Mamdani-type fuzzy inference engine: linguistic variables over discretized
//! universes, rule premises as explicit expression trees, min-implication with
//! pointwise-maximum aggregation, and centroid defuzzification.
//!
//! # Architecture
//!
//! The crate separates immutable configuration from per-call state:
//!
//! - [`variable::LinguisticVariable`] - Named variable over a [`variable::Universe`]
//!   with a term → membership-function map
//! - [`rule::Antecedent`] - Tagged premise tree (Is/And/Or/Not) evaluated by a pure
//!   recursive function
//! - [`engine::InferenceEngine`] - Validated, immutable variable and rule sets
//! - [`engine::Simulation`] - Mutable per-evaluation context borrowing one engine
//!
//! # Features
//!
//! - Triangular, trapezoidal and sampled membership functions
//! - Zadeh AND/OR/NOT premise evaluation with rule and conclusion weights
//! - Five defuzzification methods (centroid, bisector, three maximum variants)
//! - Referential validation at engine build time, fail fast before any simulation
//! - Textual premise expressions and whole-system TOML definitions
//! - Term and aggregate curve introspection for external plotting
//!
//! # Example
//!
//! ```rust
//! use fuzzctl::{
//!     Antecedent, InferenceEngine, LinguisticVariable, MembershipFunction, Rule, Universe,
//! };
//!
//! fn main() -> fuzzctl::FuzzResult<()> {
//!     let mut heat = LinguisticVariable::antecedent("heat", Universe::range(0.0, 100.0, 1.0)?);
//!     heat.add_term("low", MembershipFunction::trapezoidal(0.0, 0.0, 20.0, 40.0))?;
//!     heat.add_term("high", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0))?;
//!
//!     let mut valve = LinguisticVariable::consequent("valve", Universe::range(0.0, 100.0, 1.0)?);
//!     valve.add_term("closed", MembershipFunction::triangular(0.0, 0.0, 50.0))?;
//!     valve.add_term("open", MembershipFunction::triangular(50.0, 100.0, 100.0))?;
//!
//!     let rules = vec![
//!         Rule::single(Antecedent::is("heat", "low"), "valve", "open"),
//!         Rule::single(Antecedent::is("heat", "high"), "valve", "closed"),
//!     ];
//!     let engine = InferenceEngine::new(vec![heat, valve], rules)?;
//!
//!     let mut sim = engine.simulation();
//!     sim.set_input("heat", 15.0)?;
//!     sim.compute()?;
//!     assert!(sim.output("valve")? > 50.0);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod rule;
pub mod variable;

// Re-export error types
pub use error::{FuzzError, FuzzResult};

// Re-export variable types
pub use variable::{LinguisticVariable, MembershipFunction, Universe, VariableRole};

// Re-export rule types
pub use rule::{Antecedent, Conclusion, Rule};

// Re-export engine types
pub use engine::{
    BoundsPolicy, ComputeStats, DefuzzMethod, EngineOptions, InferenceEngine, Simulation,
    VariableCurves,
};

// Re-export parser types
pub use parser::{parse_premise, ParseError};

// Re-export configuration types
pub use config::{
    ConclusionConfig, ConfigError, EngineSection, RoleConfig, RuleConfig, SystemConfig,
    TermConfig, VariableConfig,
};
