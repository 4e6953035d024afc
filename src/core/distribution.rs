// src/core/distribution.rs
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::data::{Feature, Value};

/// Empirical pool of observed values for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDistribution {
    feature: Feature,
    values: Vec<Value>,
}

impl FeatureDistribution {
    pub fn new(feature: Feature, values: Vec<Value>) -> Self {
        FeatureDistribution { feature, values }
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Draws one value uniformly from the pool; `None` when the pool is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Value> {
        self.values.choose(rng).cloned()
    }
}

/// Per-feature empirical distributions, treated as independent of each other.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataDistribution {
    distributions: Vec<FeatureDistribution>,
}

impl DataDistribution {
    pub fn independent(distributions: Vec<FeatureDistribution>) -> Self {
        DataDistribution { distributions }
    }

    pub fn feature_distributions(&self) -> &[FeatureDistribution] {
        &self.distributions
    }

    pub fn for_feature(&self, name: &str) -> Option<&FeatureDistribution> {
        self.distributions.iter().find(|d| d.feature.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::PerturbationContext;

    fn distribution() -> DataDistribution {
        DataDistribution::independent(vec![
            FeatureDistribution::new(
                Feature::numerical("a", 0.0),
                vec![Value::Number(1.0), Value::Number(2.0)],
            ),
            FeatureDistribution::new(Feature::numerical("b", 0.0), vec![Value::Number(9.0)]),
        ])
    }

    #[test]
    fn lookup_by_feature_name() {
        let dist = distribution();
        assert_eq!(dist.for_feature("b").map(|d| d.values().len()), Some(1));
        assert!(dist.for_feature("missing").is_none());
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let empty = FeatureDistribution::new(Feature::numerical("a", 0.0), vec![]);
        let mut ctx = PerturbationContext::new(0, 1);
        assert!(empty.sample(ctx.rng()).is_none());
    }
}
