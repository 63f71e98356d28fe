//! The inference engine: a validated, immutable rule base
//!
//! An engine is the "compiled" form of a control system. Construction takes the full
//! variable and rule sets, validates every reference and weight once, and then never
//! changes. Per-call state lives in [`Simulation`], which borrows the engine, so one
//! engine can serve any number of simulations concurrently.

pub mod defuzz;
pub mod simulation;

pub use defuzz::DefuzzMethod;
pub use simulation::{ComputeStats, Simulation};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{FuzzError, FuzzResult};
use crate::rule::Rule;
use crate::variable::LinguisticVariable;

/// Handling of inputs outside a variable's universe, fixed per engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Clamp the value into the universe interval
    Clamp,
    /// Fail with `OutOfUniverse`
    Reject,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        BoundsPolicy::Clamp
    }
}

/// Build-time engine options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Defuzzification method applied to every consequent
    pub defuzz: DefuzzMethod,
    /// Out-of-range input policy
    pub bounds: BoundsPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            defuzz: DefuzzMethod::Centroid,
            bounds: BoundsPolicy::Clamp,
        }
    }
}

/// Sampled term curves of one variable, for external plotting
#[derive(Debug, Clone)]
pub struct VariableCurves {
    /// Universe sample points
    pub samples: Vec<f64>,
    /// Term name → degree per sample, in declaration order
    pub terms: IndexMap<String, Vec<f64>>,
}

/// A validated set of linguistic variables and rules.
///
/// Immutable once built; shared read-only across simulations.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    variables: IndexMap<String, LinguisticVariable>,
    rules: Vec<Rule>,
    options: EngineOptions,
    // Premise variables in first-use order; compute() checks these up front.
    required_inputs: Vec<String>,
}

impl InferenceEngine {
    /// Build an engine with default options (centroid defuzzification, clamping)
    pub fn new(variables: Vec<LinguisticVariable>, rules: Vec<Rule>) -> FuzzResult<Self> {
        Self::with_options(variables, rules, EngineOptions::default())
    }

    /// Build an engine with explicit options.
    ///
    /// Fails with `InvalidEngine` on any structural violation: duplicate variable
    /// names, malformed shapes, premises or conclusions referencing undeclared
    /// variables or terms, role misuse, or weights outside (0, 1].
    pub fn with_options(
        variables: Vec<LinguisticVariable>,
        rules: Vec<Rule>,
        options: EngineOptions,
    ) -> FuzzResult<Self> {
        let mut map: IndexMap<String, LinguisticVariable> =
            IndexMap::with_capacity(variables.len());
        for var in variables {
            var.validate()?;
            if map.contains_key(var.name()) {
                return Err(FuzzError::invalid_engine(format!(
                    "duplicate variable name: {}",
                    var.name()
                )));
            }
            map.insert(var.name().to_string(), var);
        }

        for (index, rule) in rules.iter().enumerate() {
            rule.validate(index, &map)?;
        }

        let mut required_inputs: Vec<String> = Vec::new();
        for rule in &rules {
            for name in rule.premise_variables() {
                if !required_inputs.iter().any(|n| n == name) {
                    required_inputs.push(name.to_string());
                }
            }
        }

        debug!(
            variables = map.len(),
            rules = rules.len(),
            "inference engine validated"
        );

        Ok(InferenceEngine {
            variables: map,
            rules,
            options,
            required_inputs,
        })
    }

    /// All variables keyed by name, in declaration order
    pub fn variables(&self) -> &IndexMap<String, LinguisticVariable> {
        &self.variables
    }

    /// Look up one variable
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.get(name)
    }

    /// The rule base, in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Options the engine was built with
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Antecedent variables referenced by at least one rule premise
    pub fn required_inputs(&self) -> &[String] {
        &self.required_inputs
    }

    /// Start a fresh simulation bound to this engine
    pub fn simulation(&self) -> Simulation<'_> {
        Simulation::new(self)
    }

    /// Universe samples and materialized term curves for one variable
    pub fn term_curves(&self, variable: &str) -> FuzzResult<VariableCurves> {
        let var = self
            .variables
            .get(variable)
            .ok_or_else(|| FuzzError::UnknownVariable { name: variable.to_string() })?;
        Ok(VariableCurves {
            samples: var.universe().samples().to_vec(),
            terms: var.term_curves(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Antecedent, Conclusion};
    use crate::variable::{MembershipFunction, Universe};

    fn percent_universe() -> Universe {
        Universe::range(0.0, 100.0, 1.0).unwrap()
    }

    fn heat() -> LinguisticVariable {
        let mut var = LinguisticVariable::antecedent("heat", percent_universe());
        var.add_term("low", MembershipFunction::trapezoidal(0.0, 0.0, 20.0, 40.0))
            .unwrap();
        var.add_term("high", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0))
            .unwrap();
        var
    }

    fn valve() -> LinguisticVariable {
        let mut var = LinguisticVariable::consequent("valve", percent_universe());
        var.add_term("small", MembershipFunction::trapezoidal(0.0, 0.0, 20.0, 40.0))
            .unwrap();
        var.add_term("large", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0))
            .unwrap();
        var
    }

    #[test]
    fn test_build_and_accessors() {
        let rule = Rule::single(Antecedent::is("heat", "low"), "valve", "large");
        let engine = InferenceEngine::new(vec![heat(), valve()], vec![rule]).unwrap();

        assert_eq!(engine.variables().len(), 2);
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(engine.required_inputs(), ["heat".to_string()]);
        assert_eq!(engine.options().defuzz, DefuzzMethod::Centroid);
        assert_eq!(engine.options().bounds, BoundsPolicy::Clamp);
        assert!(engine.variable("valve").is_some());
        assert!(engine.variable("pressure").is_none());
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let err = InferenceEngine::new(vec![heat(), heat()], vec![]).unwrap_err();
        assert!(err.to_string().contains("duplicate variable name"));
    }

    #[test]
    fn test_premise_must_reference_declared_term() {
        let rule = Rule::single(Antecedent::is("heat", "scalding"), "valve", "large");
        let err = InferenceEngine::new(vec![heat(), valve()], vec![rule]).unwrap_err();
        assert!(err.to_string().contains("scalding"));
    }

    #[test]
    fn test_premise_must_reference_declared_variable() {
        let rule = Rule::single(Antecedent::is("pressure", "low"), "valve", "large");
        let err = InferenceEngine::new(vec![heat(), valve()], vec![rule]).unwrap_err();
        assert!(err.to_string().contains("pressure"));
    }

    #[test]
    fn test_roles_are_enforced() {
        // Premise on a consequent
        let rule = Rule::single(Antecedent::is("valve", "small"), "valve", "large");
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![rule]).is_err());

        // Conclusion on an antecedent
        let rule = Rule::single(Antecedent::is("heat", "low"), "heat", "high");
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![rule]).is_err());
    }

    #[test]
    fn test_weights_validated_into_unit_interval() {
        let base = || Rule::single(Antecedent::is("heat", "low"), "valve", "large");
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![base().with_weight(0.0)]).is_err());
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![base().with_weight(-0.5)]).is_err());
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![base().with_weight(1.01)]).is_err());
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![base().with_weight(1.0)]).is_ok());

        let rule = Rule::new(
            Antecedent::is("heat", "low"),
            vec![Conclusion::weighted("valve", "large", 0.0)],
        );
        assert!(InferenceEngine::new(vec![heat(), valve()], vec![rule]).is_err());
    }

    #[test]
    fn test_rule_without_conclusion_rejected() {
        let rule = Rule::new(Antecedent::is("heat", "low"), vec![]);
        let err = InferenceEngine::new(vec![heat(), valve()], vec![rule]).unwrap_err();
        assert!(err.to_string().contains("at least one conclusion"));
    }

    #[test]
    fn test_error_names_rule_label() {
        let rule = Rule::single(Antecedent::is("heat", "missing"), "valve", "large")
            .with_label("emergency venting");
        let err = InferenceEngine::new(vec![heat(), valve()], vec![rule]).unwrap_err();
        assert!(err.to_string().contains("emergency venting"));
    }

    #[test]
    fn test_term_curves_for_plotting() {
        let engine = InferenceEngine::new(vec![heat(), valve()], vec![]).unwrap();
        let curves = engine.term_curves("heat").unwrap();
        assert_eq!(curves.samples.len(), 101);
        assert_eq!(curves.terms.len(), 2);
        assert_eq!(curves.terms["low"][0], 1.0);
        assert_eq!(curves.terms["high"][100], 1.0);

        let err = engine.term_curves("pressure").unwrap_err();
        assert_eq!(err, FuzzError::UnknownVariable { name: "pressure".to_string() });
    }

    #[test]
    fn test_required_inputs_deduplicated_across_rules() {
        let rules = vec![
            Rule::single(Antecedent::is("heat", "low"), "valve", "large"),
            Rule::single(Antecedent::is("heat", "high"), "valve", "small"),
        ];
        let engine = InferenceEngine::new(vec![heat(), valve()], rules).unwrap();
        assert_eq!(engine.required_inputs(), ["heat".to_string()]);
    }
}
