// src/algorithms/lime/sampler.rs

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::core::{DataDistribution, Feature, PerturbationContext, PredictionInput, Type, Value};

/// Generates `n` perturbed copies of `input`.
///
/// Each copy alters `ctx.no_of_perturbations()` randomly chosen unconstrained features
/// (fewer if the input has fewer) and keeps the rest. Random draws happen in a fixed
/// order (feature choice, then one draw per chosen feature), so a context with the
/// same seed always yields the same batch.
pub fn perturb_samples(
    input: &PredictionInput,
    ctx: &mut PerturbationContext,
    n: usize,
    distribution: Option<&DataDistribution>,
) -> Vec<PredictionInput> {
    let candidates: Vec<usize> = input
        .features()
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.is_constrained())
        .map(|(i, _)| i)
        .collect();
    let k = ctx.no_of_perturbations().min(candidates.len());

    let mut samples = Vec::with_capacity(n);
    for _ in 0..n {
        let rng = ctx.rng();
        let chosen: Vec<usize> = candidates.choose_multiple(rng, k).cloned().collect();
        let mut features: Vec<Feature> = input.features().to_vec();
        for idx in chosen {
            let value = perturb_feature(&input.features()[idx], rng, distribution);
            features[idx] = features[idx].with_value(value);
        }
        samples.push(PredictionInput::new(features));
    }
    samples
}

/// Draws a replacement value for one feature: from its empirical pool when one is
/// supplied, else from its declared domain, else by type-specific noise.
fn perturb_feature<R: Rng + ?Sized>(
    feature: &Feature,
    rng: &mut R,
    distribution: Option<&DataDistribution>,
) -> Value {
    if let Some(value) = distribution
        .and_then(|d| d.for_feature(feature.name()))
        .and_then(|d| d.sample(rng))
    {
        return value;
    }
    if let Some(value) = feature.domain().and_then(|d| d.sample(feature.value(), rng)) {
        return value;
    }
    match (feature.feature_type(), feature.value()) {
        (Type::Boolean, Value::Boolean(b)) => Value::Boolean(!b),
        (Type::Number, value) => {
            let current = value.as_number();
            let centre = if current.is_finite() { current } else { 0.0 };
            let noise: f64 = StandardNormal.sample(rng);
            Value::Number(centre + noise * centre.abs().max(1.0))
        }
        // Nothing to draw from.
        (_, value) => value.clone(),
    }
}
