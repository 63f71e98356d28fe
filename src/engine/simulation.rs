//! Per-call evaluation state
//!
//! A simulation binds crisp inputs to one engine, runs the inference pass, and holds
//! the crisp outputs plus the aggregated curves for inspection. One simulation per
//! logical evaluation; the engine itself is only read.
//!
//! `compute()` is a single bounded pass: evaluate every premise to a firing strength,
//! clip each conclusion's term curve at `firing × conclusion weight` (Mamdani
//! min-implication), aggregate per consequent with pointwise maximum, defuzzify.

use indexmap::IndexMap;
use tracing::debug;

use crate::engine::{BoundsPolicy, InferenceEngine};
use crate::error::{FuzzError, FuzzResult};
use crate::variable::VariableRole;

/// Counters from the most recent successful compute
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComputeStats {
    /// Rules whose premises were evaluated
    pub rules_evaluated: usize,
    /// Rules with firing strength above zero
    pub rules_fired: usize,
    /// Largest firing strength seen
    pub max_firing: f64,
}

/// Mutable per-evaluation context bound to one engine
#[derive(Debug)]
pub struct Simulation<'a> {
    engine: &'a InferenceEngine,
    inputs: IndexMap<String, f64>,
    outputs: IndexMap<String, f64>,
    aggregates: IndexMap<String, Vec<f64>>,
    stats: ComputeStats,
    computed: bool,
}

impl<'a> Simulation<'a> {
    /// Fresh simulation with no inputs bound
    pub fn new(engine: &'a InferenceEngine) -> Self {
        Simulation {
            engine,
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            aggregates: IndexMap::new(),
            stats: ComputeStats::default(),
            computed: false,
        }
    }

    /// Bind a crisp value to an antecedent variable.
    ///
    /// Out-of-range values follow the engine's bounds policy: clamped into the
    /// universe by default, rejected with `OutOfUniverse` under
    /// [`BoundsPolicy::Reject`]. Non-finite values are always rejected. Binding any
    /// input invalidates previously computed outputs.
    pub fn set_input(&mut self, variable: &str, value: f64) -> FuzzResult<()> {
        let var = self
            .engine
            .variable(variable)
            .filter(|v| v.role() == VariableRole::Antecedent)
            .ok_or_else(|| FuzzError::UnknownVariable { name: variable.to_string() })?;

        let universe = var.universe();
        let out_of_range = FuzzError::OutOfUniverse {
            variable: variable.to_string(),
            value,
            min: universe.min(),
            max: universe.max(),
        };
        if !value.is_finite() {
            return Err(out_of_range);
        }
        let value = match self.engine.options().bounds {
            BoundsPolicy::Clamp => universe.clamp(value),
            BoundsPolicy::Reject => {
                if !universe.contains(value) {
                    return Err(out_of_range);
                }
                value
            }
        };

        self.inputs.insert(variable.to_string(), value);
        self.invalidate();
        Ok(())
    }

    /// Currently bound inputs (after any clamping)
    pub fn inputs(&self) -> &IndexMap<String, f64> {
        &self.inputs
    }

    /// Whether outputs from a successful compute are available
    pub fn is_computed(&self) -> bool {
        self.computed
    }

    /// Counters from the most recent successful compute
    pub fn stats(&self) -> &ComputeStats {
        &self.stats
    }

    /// Run one inference pass over the bound inputs.
    ///
    /// Requires every antecedent referenced by a rule premise to have an input;
    /// otherwise fails with `MissingInput` listing every unset name. Fails with
    /// `NoRuleFired` if any consequent's aggregated curve has zero mass. On failure no
    /// outputs are observable. Re-running with identical inputs yields identical
    /// outputs.
    pub fn compute(&mut self) -> FuzzResult<ComputeStats> {
        self.invalidate();

        let missing: Vec<String> = self
            .engine
            .required_inputs()
            .iter()
            .filter(|name| !self.inputs.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(FuzzError::MissingInput { variables: missing });
        }

        let variables = self.engine.variables();
        let mut aggregates: IndexMap<String, Vec<f64>> = variables
            .iter()
            .filter(|(_, var)| var.role() == VariableRole::Consequent)
            .map(|(name, var)| (name.clone(), vec![0.0; var.universe().len()]))
            .collect();

        let mut stats = ComputeStats::default();
        for (index, rule) in self.engine.rules().iter().enumerate() {
            let firing = rule.premise.fire(&self.inputs, variables)? * rule.weight;
            stats.rules_evaluated += 1;
            if firing > 0.0 {
                stats.rules_fired += 1;
            }
            stats.max_firing = stats.max_firing.max(firing);

            let label = rule.label.as_deref().unwrap_or("");
            debug!(rule = index, label, firing, "premise evaluated");
            if firing <= 0.0 {
                continue;
            }

            for conclusion in &rule.conclusions {
                let var = variables.get(&conclusion.variable).ok_or_else(|| {
                    FuzzError::UnknownVariable { name: conclusion.variable.clone() }
                })?;
                let mf = var.term(&conclusion.term).ok_or_else(|| {
                    FuzzError::invalid_engine(format!(
                        "variable '{}' has no term named '{}'",
                        conclusion.variable, conclusion.term
                    ))
                })?;
                let curve = aggregates.get_mut(&conclusion.variable).ok_or_else(|| {
                    FuzzError::UnknownVariable { name: conclusion.variable.clone() }
                })?;

                let level = firing * conclusion.weight;
                for (slot, &y) in curve.iter_mut().zip(var.universe().samples()) {
                    let clipped = mf.degree_at(y, var.universe()).min(level);
                    if clipped > *slot {
                        *slot = clipped;
                    }
                }
            }
        }

        let defuzz = self.engine.options().defuzz;
        let mut outputs = IndexMap::with_capacity(aggregates.len());
        for (name, curve) in &aggregates {
            let var = variables.get(name).ok_or_else(|| {
                FuzzError::UnknownVariable { name: name.clone() }
            })?;
            let crisp = defuzz
                .apply(var.universe().samples(), curve)
                .ok_or_else(|| FuzzError::NoRuleFired { variable: name.clone() })?;
            outputs.insert(name.clone(), crisp);
        }

        debug!(
            outputs = outputs.len(),
            rules_fired = stats.rules_fired,
            "compute finished"
        );

        self.outputs = outputs;
        self.aggregates = aggregates;
        self.stats = stats;
        self.computed = true;
        Ok(stats)
    }

    /// Crisp output of a consequent variable
    pub fn output(&self, variable: &str) -> FuzzResult<f64> {
        self.consequent_guard(variable)?;
        match self.outputs.get(variable) {
            Some(&value) => Ok(value),
            None => Err(FuzzError::NotComputed { variable: variable.to_string() }),
        }
    }

    /// Aggregated output curve of a consequent, aligned with its universe samples
    pub fn aggregated_curve(&self, variable: &str) -> FuzzResult<&[f64]> {
        self.consequent_guard(variable)?;
        match self.aggregates.get(variable) {
            Some(curve) => Ok(curve),
            None => Err(FuzzError::NotComputed { variable: variable.to_string() }),
        }
    }

    fn consequent_guard(&self, variable: &str) -> FuzzResult<()> {
        self.engine
            .variable(variable)
            .filter(|v| v.role() == VariableRole::Consequent)
            .map(|_| ())
            .ok_or_else(|| FuzzError::UnknownVariable { name: variable.to_string() })
    }

    fn invalidate(&mut self) {
        self.computed = false;
        self.outputs.clear();
        self.aggregates.clear();
        self.stats = ComputeStats::default();
    }
}
