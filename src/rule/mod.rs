//! Rules: fuzzy premises paired with weighted conclusions
//!
//! A premise is an explicit expression tree (`Antecedent`) built declaratively with
//! `is`/`and`/`or`/`not` combinators and evaluated by a pure recursive function over the
//! simulation's crisp inputs:
//! - And: minimum of children (Zadeh)
//! - Or: maximum of children (Zadeh)
//! - Not: complement, 1 - child
//!
//! The tree holds only names. No variable or engine state is shared through it, and every
//! referenced name is checked against the engine at build time.

use indexmap::IndexMap;

use crate::error::{FuzzError, FuzzResult};
use crate::variable::{LinguisticVariable, VariableRole};

/// Premise expression over antecedent term memberships
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    /// Membership of one variable's input in one term
    Is { variable: String, term: String },
    /// Conjunction: minimum over children
    And(Vec<Antecedent>),
    /// Disjunction: maximum over children
    Or(Vec<Antecedent>),
    /// Complement of the child
    Not(Box<Antecedent>),
}

impl Antecedent {
    /// Leaf premise: `variable is term`
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    /// Conjoin with another expression. Chained calls flatten into one n-ary node.
    pub fn and(self, other: Antecedent) -> Self {
        match self {
            Antecedent::And(mut children) => {
                children.push(other);
                Antecedent::And(children)
            }
            first => Antecedent::And(vec![first, other]),
        }
    }

    /// Disjoin with another expression. Chained calls flatten into one n-ary node.
    pub fn or(self, other: Antecedent) -> Self {
        match self {
            Antecedent::Or(mut children) => {
                children.push(other);
                Antecedent::Or(children)
            }
            first => Antecedent::Or(vec![first, other]),
        }
    }

    /// Negate this expression
    pub fn not(self) -> Self {
        Antecedent::Not(Box::new(self))
    }

    /// Evaluate the premise to a firing degree in [0, 1].
    ///
    /// Fails with `UnboundVariable` when a leaf's variable has no input value; there is
    /// no implicit default, since a silent zero would change which rules can fire.
    pub fn fire(
        &self,
        inputs: &IndexMap<String, f64>,
        variables: &IndexMap<String, LinguisticVariable>,
    ) -> FuzzResult<f64> {
        match self {
            Antecedent::Is { variable, term } => {
                let var = variables.get(variable).ok_or_else(|| {
                    FuzzError::UnknownVariable { name: variable.clone() }
                })?;
                let mf = var.term(term).ok_or_else(|| {
                    FuzzError::invalid_engine(format!(
                        "variable '{variable}' has no term named '{term}'"
                    ))
                })?;
                let x = inputs.get(variable).copied().ok_or_else(|| {
                    FuzzError::UnboundVariable { name: variable.clone() }
                })?;
                Ok(mf.degree_at(x, var.universe()))
            }
            Antecedent::And(children) => {
                let mut degree: f64 = 1.0;
                for child in children {
                    degree = degree.min(child.fire(inputs, variables)?);
                }
                Ok(degree)
            }
            Antecedent::Or(children) => {
                let mut degree: f64 = 0.0;
                for child in children {
                    degree = degree.max(child.fire(inputs, variables)?);
                }
                Ok(degree)
            }
            Antecedent::Not(child) => Ok(1.0 - child.fire(inputs, variables)?),
        }
    }

    /// Names of all variables referenced by leaves, first occurrence order, deduplicated
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Antecedent::Is { variable, .. } => {
                if !names.contains(&variable.as_str()) {
                    names.push(variable);
                }
            }
            Antecedent::And(children) | Antecedent::Or(children) => {
                for child in children {
                    child.collect_variables(names);
                }
            }
            Antecedent::Not(child) => child.collect_variables(names),
        }
    }

    pub(crate) fn validate(
        &self,
        variables: &IndexMap<String, LinguisticVariable>,
    ) -> FuzzResult<()> {
        match self {
            Antecedent::Is { variable, term } => {
                let var = variables.get(variable).ok_or_else(|| {
                    FuzzError::invalid_engine(format!(
                        "premise references undeclared variable '{variable}'"
                    ))
                })?;
                if var.role() != VariableRole::Antecedent {
                    return Err(FuzzError::invalid_engine(format!(
                        "premise references '{variable}', which is not an antecedent"
                    )));
                }
                if var.term(term).is_none() {
                    return Err(FuzzError::invalid_engine(format!(
                        "premise references unknown term '{term}' on variable '{variable}'"
                    )));
                }
                Ok(())
            }
            Antecedent::And(children) | Antecedent::Or(children) => {
                if children.is_empty() {
                    return Err(FuzzError::invalid_engine(
                        "and/or node must have at least one child",
                    ));
                }
                for child in children {
                    child.validate(variables)?;
                }
                Ok(())
            }
            Antecedent::Not(child) => child.validate(variables),
        }
    }
}

/// One weighted contribution of a rule to a consequent variable
#[derive(Debug, Clone, PartialEq)]
pub struct Conclusion {
    /// Consequent variable receiving the contribution
    pub variable: String,
    /// Term whose membership curve is clipped
    pub term: String,
    /// Per-conclusion weight in (0, 1]
    pub weight: f64,
}

impl Conclusion {
    /// Full-weight conclusion
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self::weighted(variable, term, 1.0)
    }

    /// Conclusion with an explicit weight
    pub fn weighted(variable: impl Into<String>, term: impl Into<String>, weight: f64) -> Self {
        Conclusion {
            variable: variable.into(),
            term: term.into(),
            weight,
        }
    }
}

/// A premise plus one or more weighted conclusions.
///
/// The rule weight multiplies the firing strength once per rule; each conclusion weight
/// applies on top, per conclusion. Rules are immutable once handed to an engine.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Optional label carried through firing diagnostics
    pub label: Option<String>,
    /// Premise evaluated to the firing strength
    pub premise: Antecedent,
    /// Conclusions applied in order
    pub conclusions: Vec<Conclusion>,
    /// Rule weight in (0, 1], multiplies the firing strength
    pub weight: f64,
}

impl Rule {
    /// Rule with explicit conclusions and weight 1
    pub fn new(premise: Antecedent, conclusions: Vec<Conclusion>) -> Self {
        Rule {
            label: None,
            premise,
            conclusions,
            weight: 1.0,
        }
    }

    /// Rule with a single full-weight conclusion
    pub fn single(
        premise: Antecedent,
        variable: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self::new(premise, vec![Conclusion::new(variable, term)])
    }

    /// Set the rule weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Attach a diagnostic label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Antecedent variables this rule's premise reads
    pub fn premise_variables(&self) -> Vec<&str> {
        self.premise.variables()
    }

    pub(crate) fn validate(
        &self,
        index: usize,
        variables: &IndexMap<String, LinguisticVariable>,
    ) -> FuzzResult<()> {
        let context = || match &self.label {
            Some(label) => format!("rule '{label}'"),
            None => format!("rule #{index}"),
        };

        self.premise.validate(variables).map_err(|err| match err {
            FuzzError::InvalidEngine { reason } => {
                FuzzError::invalid_engine(format!("{}: {}", context(), reason))
            }
            other => other,
        })?;

        if self.conclusions.is_empty() {
            return Err(FuzzError::invalid_engine(format!(
                "{}: a rule needs at least one conclusion",
                context()
            )));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 || self.weight > 1.0 {
            return Err(FuzzError::invalid_engine(format!(
                "{}: rule weight {} is outside (0, 1]",
                context(),
                self.weight
            )));
        }

        for conclusion in &self.conclusions {
            let var = variables.get(&conclusion.variable).ok_or_else(|| {
                FuzzError::invalid_engine(format!(
                    "{}: conclusion references undeclared variable '{}'",
                    context(),
                    conclusion.variable
                ))
            })?;
            if var.role() != VariableRole::Consequent {
                return Err(FuzzError::invalid_engine(format!(
                    "{}: conclusion targets '{}', which is not a consequent",
                    context(),
                    conclusion.variable
                )));
            }
            if var.term(&conclusion.term).is_none() {
                return Err(FuzzError::invalid_engine(format!(
                    "{}: conclusion references unknown term '{}' on variable '{}'",
                    context(),
                    conclusion.term,
                    conclusion.variable
                )));
            }
            if !conclusion.weight.is_finite()
                || conclusion.weight <= 0.0
                || conclusion.weight > 1.0
            {
                return Err(FuzzError::invalid_engine(format!(
                    "{}: conclusion weight {} is outside (0, 1]",
                    context(),
                    conclusion.weight
                )));
            }
        }
        Ok(())
    }
}
