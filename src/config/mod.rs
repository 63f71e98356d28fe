//! TOML system definitions
//!
//! A whole control system can be declared in one TOML file and compiled into a
//! validated [`InferenceEngine`]: variables with their universes and term shapes,
//! rules with textual premises, and engine options. Declaration order of variables
//! and terms is preserved through to introspection.
//!
//! # Example Definition
//!
//! ```toml
//! [engine]
//! defuzz = "centroid"
//! bounds = "clamp"
//!
//! [variables.temperatura]
//! role = "antecedent"
//! range = [0.0, 100.0]
//! step = 1.0
//!
//! [variables.temperatura.terms]
//! baixa = { trapezoid = [0.0, 0.0, 20.0, 40.0] }
//! media = { trapezoid = [30.0, 40.0, 60.0, 70.0] }
//! alta = { trapezoid = [60.0, 80.0, 100.0, 100.0] }
//!
//! [variables.abertura_valvula]
//! role = "consequent"
//! range = [0.0, 100.0]
//! step = 1.0
//!
//! [variables.abertura_valvula.terms]
//! pequena = { trapezoid = [0.0, 0.0, 20.0, 40.0] }
//! grande = { trapezoid = [60.0, 80.0, 100.0, 100.0] }
//!
//! [[rules]]
//! label = "fria abre a valvula"
//! premise = "temperatura is baixa"
//! conclude = [{ variable = "abertura_valvula", term = "grande" }]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::{BoundsPolicy, DefuzzMethod, EngineOptions, InferenceEngine};
use crate::error::FuzzError;
use crate::parser::{parse_premise, ParseError};
use crate::rule::{Conclusion, Rule};
use crate::variable::{LinguisticVariable, MembershipFunction, Universe, VariableRole};

/// Errors from loading and compiling definition files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read '{path}': {message}")]
    Io { path: PathBuf, message: String },

    /// The text is not valid TOML or does not match the schema
    #[error("invalid definition: {0}")]
    Toml(#[from] toml::de::Error),

    /// A rule's premise text did not parse
    #[error("rule {index}: {source}")]
    Premise {
        index: usize,
        #[source]
        source: ParseError,
    },

    /// An unknown defuzzification method name
    #[error("unknown defuzzification method: {0}")]
    UnknownDefuzz(String),

    /// An unknown bounds policy name
    #[error("unknown bounds policy: {0}")]
    UnknownBounds(String),

    /// The definition parsed but failed engine validation
    #[error(transparent)]
    Build(#[from] FuzzError),
}

/// Top-level definition file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Engine options; every field optional
    #[serde(default)]
    pub engine: EngineSection,
    /// Variables keyed by name, declaration order preserved
    pub variables: IndexMap<String, VariableConfig>,
    /// Rule list; may be empty for membership-design work
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// `[engine]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// centroid | bisector | mean_of_max | smallest_of_max | largest_of_max
    pub defuzz: Option<String>,
    /// clamp | reject
    pub bounds: Option<String>,
}

/// Variable role as written in definition files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleConfig {
    Antecedent,
    Consequent,
}

/// One `[variables.<name>]` block
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableConfig {
    /// antecedent | consequent
    pub role: RoleConfig,
    /// Universe interval [min, max]
    pub range: [f64; 2],
    /// Universe sampling step
    pub step: f64,
    /// Term shapes keyed by term name
    pub terms: IndexMap<String, TermConfig>,
}

/// A term shape: `{ triangle = [a, b, c] }`, `{ trapezoid = [a, b, c, d] }` or
/// `{ sampled = [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermConfig {
    Triangle([f64; 3]),
    Trapezoid([f64; 4]),
    Sampled(Vec<f64>),
}

/// One `[[rules]]` block
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Optional diagnostic label
    pub label: Option<String>,
    /// Premise expression text, e.g. `temperatura is baixa and fluxo_agua is alto`
    pub premise: String,
    /// Rule weight, defaults to 1
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Weighted conclusions
    pub conclude: Vec<ConclusionConfig>,
}

/// One conclusion inside a rule
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConclusionConfig {
    pub variable: String,
    pub term: String,
    /// Conclusion weight, defaults to 1
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl SystemConfig {
    /// Load a definition from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::load_from_str(&text)
    }

    /// Load a definition from TOML text
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Compile the definition into a validated engine
    pub fn build(&self) -> Result<InferenceEngine, ConfigError> {
        let options = self.engine.to_options()?;

        let mut variables = Vec::with_capacity(self.variables.len());
        for (name, config) in &self.variables {
            let role = match config.role {
                RoleConfig::Antecedent => VariableRole::Antecedent,
                RoleConfig::Consequent => VariableRole::Consequent,
            };
            let universe = Universe::range(config.range[0], config.range[1], config.step)
                .map_err(|err| match err {
                    FuzzError::InvalidEngine { reason } => {
                        FuzzError::invalid_engine(format!("variable '{name}': {reason}"))
                    }
                    other => other,
                })?;

            let mut variable = LinguisticVariable::new(name.clone(), role, universe);
            for (term, shape) in &config.terms {
                variable.add_term(term.clone(), shape.to_membership())?;
            }
            variables.push(variable);
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for (index, config) in self.rules.iter().enumerate() {
            let premise = parse_premise(&config.premise)
                .map_err(|source| ConfigError::Premise { index, source })?;
            let conclusions = config
                .conclude
                .iter()
                .map(|c| Conclusion::weighted(c.variable.clone(), c.term.clone(), c.weight))
                .collect();

            let mut rule = Rule::new(premise, conclusions).with_weight(config.weight);
            if let Some(label) = &config.label {
                rule = rule.with_label(label.clone());
            }
            rules.push(rule);
        }

        Ok(InferenceEngine::with_options(variables, rules, options)?)
    }
}

impl EngineSection {
    fn to_options(&self) -> Result<EngineOptions, ConfigError> {
        let mut options = EngineOptions::default();
        if let Some(name) = &self.defuzz {
            options.defuzz = DefuzzMethod::from_name(name)
                .ok_or_else(|| ConfigError::UnknownDefuzz(name.clone()))?;
        }
        if let Some(name) = &self.bounds {
            options.bounds = match name.as_str() {
                "clamp" => BoundsPolicy::Clamp,
                "reject" => BoundsPolicy::Reject,
                _ => return Err(ConfigError::UnknownBounds(name.clone())),
            };
        }
        Ok(options)
    }
}

impl TermConfig {
    fn to_membership(&self) -> MembershipFunction {
        match self {
            TermConfig::Triangle([a, b, c]) => MembershipFunction::triangular(*a, *b, *c),
            TermConfig::Trapezoid([a, b, c, d]) => {
                MembershipFunction::trapezoidal(*a, *b, *c, *d)
            }
            TermConfig::Sampled(degrees) => MembershipFunction::sampled(degrees.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW_SYSTEM: &str = r#"
        [engine]
        defuzz = "centroid"
        bounds = "clamp"

        [variables.temperatura]
        role = "antecedent"
        range = [0.0, 100.0]
        step = 1.0

        [variables.temperatura.terms]
        baixa = { trapezoid = [0.0, 0.0, 20.0, 40.0] }
        media = { trapezoid = [30.0, 40.0, 60.0, 70.0] }
        alta = { trapezoid = [60.0, 80.0, 100.0, 100.0] }

        [variables.fluxo_agua]
        role = "antecedent"
        range = [0.0, 100.0]
        step = 1.0

        [variables.fluxo_agua.terms]
        baixo = { trapezoid = [0.0, 0.0, 20.0, 40.0] }
        medio = { trapezoid = [30.0, 40.0, 60.0, 70.0] }
        alto = { trapezoid = [60.0, 80.0, 100.0, 100.0] }

        [variables.abertura_valvula]
        role = "consequent"
        range = [0.0, 100.0]
        step = 1.0

        [variables.abertura_valvula.terms]
        pequena = { trapezoid = [0.0, 0.0, 20.0, 40.0] }
        moderada = { trapezoid = [30.0, 40.0, 60.0, 70.0] }
        grande = { trapezoid = [60.0, 80.0, 100.0, 100.0] }

        [[rules]]
        label = "fria e fluxo alto"
        premise = "temperatura is baixa and fluxo_agua is alto"
        conclude = [{ variable = "abertura_valvula", term = "grande" }]

        [[rules]]
        premise = "temperatura is baixa and fluxo_agua is medio"
        conclude = [{ variable = "abertura_valvula", term = "moderada" }]

        [[rules]]
        premise = "temperatura is media and fluxo_agua is alto"
        conclude = [{ variable = "abertura_valvula", term = "moderada" }]

        [[rules]]
        premise = "temperatura is media and fluxo_agua is baixo"
        conclude = [{ variable = "abertura_valvula", term = "pequena" }]

        [[rules]]
        premise = "temperatura is alta and fluxo_agua is baixo"
        conclude = [{ variable = "abertura_valvula", term = "pequena" }]

        [[rules]]
        premise = "temperatura is alta and fluxo_agua is alto"
        conclude = [{ variable = "abertura_valvula", term = "moderada" }]
    "#;

    #[test]
    fn test_parse_flow_system() {
        let config = SystemConfig::load_from_str(FLOW_SYSTEM).unwrap();
        assert_eq!(config.variables.len(), 3);
        assert_eq!(config.rules.len(), 6);
        assert_eq!(config.variables["temperatura"].terms.len(), 3);
        assert_eq!(config.rules[0].label.as_deref(), Some("fria e fluxo alto"));
        assert_eq!(config.rules[0].weight, 1.0);
        assert_eq!(config.rules[0].conclude[0].weight, 1.0);
    }

    #[test]
    fn test_build_and_run_flow_system() {
        let engine = SystemConfig::load_from_str(FLOW_SYSTEM).unwrap().build().unwrap();
        assert_eq!(engine.variables().len(), 3);
        assert_eq!(engine.rules().len(), 6);

        let mut sim = engine.simulation();
        sim.set_input("temperatura", 45.0).unwrap();
        sim.set_input("fluxo_agua", 80.0).unwrap();
        sim.compute().unwrap();
        let opening = sim.output("abertura_valvula").unwrap();
        assert!((opening - 50.0).abs() < 0.25, "got {opening}");
    }

    #[test]
    fn test_engine_section_defaults() {
        let text = r#"
            [variables.x]
            role = "antecedent"
            range = [0.0, 10.0]
            step = 1.0

            [variables.x.terms]
            high = { triangle = [0.0, 10.0, 10.0] }
        "#;
        let config = SystemConfig::load_from_str(text).unwrap();
        let engine = config.build().unwrap();
        assert_eq!(engine.options().defuzz, DefuzzMethod::Centroid);
        assert_eq!(engine.options().bounds, BoundsPolicy::Clamp);
    }

    #[test]
    fn test_sampled_and_triangle_terms() {
        let text = r#"
            [variables.x]
            role = "antecedent"
            range = [0.0, 2.0]
            step = 1.0

            [variables.x.terms]
            ramp = { triangle = [0.0, 2.0, 2.0] }
            flat = { sampled = [0.25, 0.25, 0.25] }
        "#;
        let engine = SystemConfig::load_from_str(text).unwrap().build().unwrap();
        let var = engine.variable("x").unwrap();
        assert_eq!(var.fuzzify(1.0)["ramp"], 0.5);
        assert_eq!(var.fuzzify(1.5)["flat"], 0.25);
    }

    #[test]
    fn test_unknown_engine_options_rejected() {
        let text = r#"
            [engine]
            defuzz = "median"

            [variables.x]
            role = "antecedent"
            range = [0.0, 1.0]
            step = 0.5
            terms = {}
        "#;
        let err = SystemConfig::load_from_str(text).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDefuzz(name) if name == "median"));

        let text = r#"
            [engine]
            bounds = "wrap"

            [variables.x]
            role = "antecedent"
            range = [0.0, 1.0]
            step = 0.5
            terms = {}
        "#;
        let err = SystemConfig::load_from_str(text).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBounds(name) if name == "wrap"));
    }

    #[test]
    fn test_bad_premise_reports_rule_index() {
        let text = r#"
            [variables.x]
            role = "antecedent"
            range = [0.0, 1.0]
            step = 0.5

            [variables.x.terms]
            high = { triangle = [0.0, 1.0, 1.0] }

            [variables.y]
            role = "consequent"
            range = [0.0, 1.0]
            step = 0.5

            [variables.y.terms]
            open = { triangle = [0.0, 1.0, 1.0] }

            [[rules]]
            premise = "x is high"
            conclude = [{ variable = "y", term = "open" }]

            [[rules]]
            premise = "x is and"
            conclude = [{ variable = "y", term = "open" }]
        "#;
        let err = SystemConfig::load_from_str(text).unwrap().build().unwrap_err();
        match err {
            ConfigError::Premise { index, .. } => assert_eq!(index, 1),
            other => panic!("expected premise error, got {other}"),
        }
    }

    #[test]
    fn test_build_surfaces_validation_failures() {
        let text = r#"
            [variables.x]
            role = "antecedent"
            range = [0.0, 1.0]
            step = 0.5

            [variables.x.terms]
            high = { triangle = [0.0, 1.0, 1.0] }

            [[rules]]
            premise = "x is missing_term"
            conclude = [{ variable = "x", term = "high" }]
        "#;
        let err = SystemConfig::load_from_str(text).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::Build(FuzzError::InvalidEngine { .. })));
    }

    #[test]
    fn test_schema_typos_rejected() {
        let text = r#"
            [variables.x]
            role = "antecedent"
            range = [0.0, 1.0]
            stepp = 0.5
            terms = {}
        "#;
        assert!(matches!(
            SystemConfig::load_from_str(text),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = SystemConfig::load_from_file("/nonexistent/system.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/system.toml"));
            }
            other => panic!("expected io error, got {other}"),
        }
    }
}
