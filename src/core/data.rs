// src/core/data.rs
use ndarray::Array2;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::context::PerturbationContext;

/// Numeric matrix view of a batch of inputs: one row per input, one column per feature.
pub type Dataset = Array2<f64>;

/// A single feature or output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// Numeric view of the value. Text is parsed when possible, NaN otherwise.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(v) => *v,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }

    /// Same-value check where NaN equals NaN, so an untouched NaN feature does not
    /// read as perturbed.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Number,
    Categorical,
    Boolean,
}

impl Type {
    /// Draws an arbitrary value of this type from the context's generator.
    pub fn random_value(&self, ctx: &mut PerturbationContext) -> Value {
        let rng = ctx.rng();
        match self {
            Type::Number => Value::Number(rng.gen::<f64>()),
            Type::Boolean => Value::Boolean(rng.gen::<bool>()),
            Type::Categorical => {
                let label: String = (0..8).map(|_| rng.sample(Alphanumeric) as char).collect();
                Value::Text(label)
            }
        }
    }
}

/// Declared set of legal values for a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureDomain {
    Numerical { lower: f64, upper: f64 },
    Categorical(Vec<Value>),
}

impl FeatureDomain {
    pub fn numerical(lower: f64, upper: f64) -> Self {
        FeatureDomain::Numerical { lower, upper }
    }

    pub fn categorical<V: Into<Value>>(categories: impl IntoIterator<Item = V>) -> Self {
        FeatureDomain::Categorical(categories.into_iter().map(Into::into).collect())
    }

    /// Width of a numerical domain, if it has a usable one: both bounds finite,
    /// `upper > lower` and a finite difference.
    pub fn range(&self) -> Option<f64> {
        match self {
            FeatureDomain::Numerical { lower, upper } => finite_width(*lower, *upper),
            FeatureDomain::Categorical(_) => None,
        }
    }

    /// Draws a value from the domain, avoiding `current` for categorical domains when
    /// another category exists. Numerical domains with a non-finite bound or width
    /// yield `None`.
    pub fn sample<R: Rng + ?Sized>(&self, current: &Value, rng: &mut R) -> Option<Value> {
        match self {
            FeatureDomain::Numerical { lower, upper } => {
                if finite_width(*lower, *upper).is_some() {
                    Some(Value::Number(rng.gen_range(*lower..*upper)))
                } else if lower.is_finite() && upper.is_finite() {
                    // Empty or inverted interval.
                    Some(Value::Number(*lower))
                } else {
                    None
                }
            }
            FeatureDomain::Categorical(categories) => {
                let others: Vec<&Value> =
                    categories.iter().filter(|c| !c.same_as(current)).collect();
                if others.is_empty() {
                    categories.choose(rng).cloned()
                } else {
                    others.choose(rng).map(|v| (*v).clone())
                }
            }
        }
    }
}

fn finite_width(lower: f64, upper: f64) -> Option<f64> {
    let width = upper - lower;
    (lower.is_finite() && upper.is_finite() && width.is_finite() && width > 0.0).then_some(width)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    name: String,
    feature_type: Type,
    value: Value,
    constrained: bool,
    domain: Option<FeatureDomain>,
}

impl Feature {
    pub fn new(
        name: impl Into<String>,
        feature_type: Type,
        value: Value,
        constrained: bool,
        domain: Option<FeatureDomain>,
    ) -> Self {
        Feature {
            name: name.into(),
            feature_type,
            value,
            constrained,
            domain,
        }
    }

    pub fn numerical(name: impl Into<String>, value: f64) -> Self {
        Feature::new(name, Type::Number, Value::Number(value), false, None)
    }

    pub fn numerical_in(name: impl Into<String>, value: f64, lower: f64, upper: f64) -> Self {
        Feature::new(
            name,
            Type::Number,
            Value::Number(value),
            false,
            Some(FeatureDomain::numerical(lower, upper)),
        )
    }

    pub fn categorical(
        name: impl Into<String>,
        value: impl Into<Value>,
        domain: FeatureDomain,
    ) -> Self {
        Feature::new(name, Type::Categorical, value.into(), false, Some(domain))
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Feature::new(name, Type::Boolean, Value::Boolean(value), false, None)
    }

    /// Copy of this feature carrying a different value.
    pub fn with_value(&self, value: Value) -> Self {
        Feature {
            value,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_type(&self) -> Type {
        self.feature_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_constrained(&self) -> bool {
        self.constrained
    }

    pub fn domain(&self) -> Option<&FeatureDomain> {
        self.domain.as_ref()
    }
}

/// Ordered features fed to a model. Order is preserved through sampling and reporting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionInput {
    features: Vec<Feature>,
}

impl PredictionInput {
    pub fn new(features: Vec<Feature>) -> Self {
        PredictionInput { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// One named decision produced by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    name: String,
    output_type: Type,
    value: Value,
    score: f64,
}

impl Output {
    pub fn new(name: impl Into<String>, output_type: Type, value: Value, score: f64) -> Self {
        Output {
            name: name.into(),
            output_type,
            value,
            score,
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Output::new(name, Type::Number, Value::Number(value), 1.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_type(&self) -> Type {
        self.output_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionOutput {
    outputs: Vec<Output>,
}

impl PredictionOutput {
    pub fn new(outputs: Vec<Output>) -> Self {
        PredictionOutput { outputs }
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn by_name(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }
}

/// The input/output pair being explained.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    input: PredictionInput,
    output: PredictionOutput,
}

impl Prediction {
    pub fn new(input: PredictionInput, output: PredictionOutput) -> Self {
        Prediction { input, output }
    }

    pub fn input(&self) -> &PredictionInput {
        &self.input
    }

    pub fn output(&self) -> &PredictionOutput {
        &self.output
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: Feature,
    pub score: f64,
}

impl FeatureImportance {
    pub fn new(feature: Feature, score: f64) -> Self {
        FeatureImportance { feature, score }
    }
}

/// Per-output report of each retained feature's local contribution, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saliency {
    output: Output,
    per_feature_importance: Vec<FeatureImportance>,
}

impl Saliency {
    pub fn new(output: Output, per_feature_importance: Vec<FeatureImportance>) -> Self {
        Saliency {
            output,
            per_feature_importance,
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn per_feature_importance(&self) -> &[FeatureImportance] {
        &self.per_feature_importance
    }

    pub fn scores(&self) -> Vec<f64> {
        self.per_feature_importance.iter().map(|fi| fi.score).collect()
    }
}
