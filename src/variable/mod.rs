//! Linguistic variables
//!
//! A linguistic variable names a quantity ("temperature"), owns the universe it is
//! measured on, and partitions that universe into named terms ("low", "high"), each
//! backed by a membership function. Variables are configuration: they are assembled
//! once, validated at engine build time, and never mutated afterwards.

pub mod membership;
pub mod universe;

pub use membership::MembershipFunction;
pub use universe::Universe;

use indexmap::IndexMap;

use crate::error::{FuzzError, FuzzResult};

/// Position of a variable within the rule base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    /// Input: referenced by rule premises, bound to crisp values per simulation
    Antecedent,
    /// Output: receives rule conclusions and a defuzzified crisp value
    Consequent,
}

/// A named variable over one universe with a term → membership-function map.
///
/// Term insertion order is preserved so fuzzification results and plotted curves come
/// back in declaration order.
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    role: VariableRole,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    /// Create a variable with the given role and no terms yet
    pub fn new(name: impl Into<String>, role: VariableRole, universe: Universe) -> Self {
        LinguisticVariable {
            name: name.into(),
            role,
            universe,
            terms: IndexMap::new(),
        }
    }

    /// Create an input variable
    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, VariableRole::Antecedent, universe)
    }

    /// Create an output variable
    pub fn consequent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, VariableRole::Consequent, universe)
    }

    /// Add a named term. Duplicate names are rejected rather than overwritten.
    pub fn add_term(
        &mut self,
        term: impl Into<String>,
        mf: MembershipFunction,
    ) -> FuzzResult<()> {
        let term = term.into();
        if self.terms.contains_key(&term) {
            return Err(FuzzError::invalid_engine(format!(
                "variable '{}' already has a term named '{}'",
                self.name, term
            )));
        }
        self.terms.insert(term, mf);
        Ok(())
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input or output role
    pub fn role(&self) -> VariableRole {
        self.role
    }

    /// The universe this variable is measured on
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// All terms in declaration order
    pub fn terms(&self) -> &IndexMap<String, MembershipFunction> {
        &self.terms
    }

    /// Look up one term's membership function
    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    /// Membership degree of `x` in every term, in declaration order
    pub fn fuzzify(&self, x: f64) -> IndexMap<String, f64> {
        self.terms
            .iter()
            .map(|(term, mf)| (term.clone(), mf.degree_at(x, &self.universe)))
            .collect()
    }

    /// Every term's curve materialized over the universe samples
    pub fn term_curves(&self) -> IndexMap<String, Vec<f64>> {
        self.terms
            .iter()
            .map(|(term, mf)| (term.clone(), mf.sample(&self.universe)))
            .collect()
    }

    /// Per-variable structural checks, run by the engine at build time
    pub fn validate(&self) -> FuzzResult<()> {
        if self.name.is_empty() {
            return Err(FuzzError::invalid_engine("variable name must not be empty"));
        }
        if self.universe.len() < 2 {
            return Err(FuzzError::invalid_engine(format!(
                "variable '{}' has a universe with fewer than 2 samples",
                self.name
            )));
        }
        for (term, mf) in &self.terms {
            mf.validate(&self.universe).map_err(|err| match err {
                FuzzError::InvalidEngine { reason } => FuzzError::invalid_engine(format!(
                    "variable '{}', term '{}': {}",
                    self.name, term, reason
                )),
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature() -> LinguisticVariable {
        let mut var =
            LinguisticVariable::antecedent("temperatura", Universe::range(0.0, 100.0, 1.0).unwrap());
        var.add_term("baixa", MembershipFunction::trapezoidal(0.0, 0.0, 20.0, 40.0))
            .unwrap();
        var.add_term("media", MembershipFunction::triangular(30.0, 50.0, 70.0))
            .unwrap();
        var.add_term("alta", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0))
            .unwrap();
        var
    }

    #[test]
    fn test_fuzzify_cold_value() {
        let var = temperature();
        let degrees = deg_vec(&var.fuzzify(10.0));
        assert_eq!(degrees, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fuzzify_between_terms() {
        let var = temperature();
        let degrees = var.fuzzify(35.0);
        assert!((degrees["baixa"] - 0.25).abs() < 1e-12);
        assert!((degrees["media"] - 0.25).abs() < 1e-12);
        assert_eq!(degrees["alta"], 0.0);
    }

    #[test]
    fn test_terms_keep_declaration_order() {
        let var = temperature();
        let names: Vec<&str> = var.terms().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["baixa", "media", "alta"]);
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let mut var = temperature();
        let err = var
            .add_term("media", MembershipFunction::triangular(0.0, 1.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, FuzzError::InvalidEngine { .. }));
    }

    #[test]
    fn test_term_curves_align_with_universe() {
        let var = temperature();
        let curves = var.term_curves();
        for curve in curves.values() {
            assert_eq!(curve.len(), var.universe().len());
        }
        assert_eq!(curves["media"][50], 1.0);
        assert_eq!(curves["media"][30], 0.0);
    }

    #[test]
    fn test_validate_reports_term_context() {
        let mut var = temperature();
        var.terms.insert(
            "quebrada".to_string(),
            MembershipFunction::triangular(50.0, 40.0, 60.0),
        );
        let err = var.validate().unwrap_err();
        assert!(err.to_string().contains("quebrada"));
    }

    fn deg_vec(map: &indexmap::IndexMap<String, f64>) -> Vec<f64> {
        map.values().copied().collect()
    }
}
