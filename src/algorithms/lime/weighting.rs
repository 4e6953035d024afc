// src/algorithms/lime/weighting.rs

use ndarray::Array1;

use crate::core::{Feature, PredictionInput, Type};

/// LIME's default kernel width factor, scaled by the square root of the feature count.
const KERNEL_WIDTH_FACTOR: f64 = 0.75;

/// Similarity of each perturbed sample to the original input, in (0, 1].
///
/// Per-feature distances are scaled to [0, 1]: numeric differences by the feature's
/// domain range (else the spread observed across the batch), categorical and boolean
/// mismatches count as 1. The weight is the exponential kernel
/// `exp(-d^2 / width^2)` of the Euclidean distance `d`, with
/// `width = 0.75 * sqrt(n_features)`.
pub fn proximity_weights(original: &PredictionInput, samples: &[PredictionInput]) -> Array1<f64> {
    let n_features = original.len();
    if n_features == 0 {
        return Array1::ones(samples.len());
    }
    let scales: Vec<f64> = (0..n_features)
        .map(|j| numeric_scale(&original.features()[j], j, samples))
        .collect();
    let width = KERNEL_WIDTH_FACTOR * (n_features as f64).sqrt();

    samples
        .iter()
        .map(|sample| {
            let squared: f64 = original
                .features()
                .iter()
                .zip(sample.features())
                .zip(&scales)
                .map(|((reference, feature), scale)| {
                    let d = feature_distance(reference, feature, *scale);
                    d * d
                })
                .sum();
            (-squared / (width * width)).exp()
        })
        .collect()
}

fn numeric_scale(reference: &Feature, index: usize, samples: &[PredictionInput]) -> f64 {
    if reference.feature_type() != Type::Number {
        return 1.0;
    }
    if let Some(range) = reference.domain().and_then(|d| d.range()) {
        return range;
    }
    let observed = samples
        .iter()
        .filter_map(|s| s.features().get(index))
        .chain(std::iter::once(reference))
        .map(|f| f.value().as_number())
        .filter(|v| v.is_finite());
    let (lo, hi) = observed.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if hi > lo {
        hi - lo
    } else {
        1.0
    }
}

fn feature_distance(reference: &Feature, feature: &Feature, scale: f64) -> f64 {
    if reference.value().same_as(feature.value()) {
        return 0.0;
    }
    match reference.feature_type() {
        Type::Number => {
            let diff = (feature.value().as_number() - reference.value().as_number()).abs() / scale;
            if diff.is_finite() {
                diff.min(1.0)
            } else {
                1.0
            }
        }
        Type::Categorical | Type::Boolean => 1.0,
    }
}

/// Per-feature shrink factors in [0, 1] penalising imbalanced alteration patterns.
///
/// For feature `j`, `p` is the weighted share of samples in which `j` differs from the
/// original; the factor is `1 - |1 - 2p|`, so a feature altered in half of the
/// (weighted) batch keeps its score while one almost never or almost always altered
/// is driven towards 0. Multiplying a coefficient by the factor never increases its
/// magnitude.
pub fn sparse_balance_penalties(
    original: &PredictionInput,
    samples: &[PredictionInput],
    weights: &Array1<f64>,
) -> Array1<f64> {
    let n_features = original.len();
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if samples.is_empty() || total <= 1e-12 {
        return Array1::ones(n_features);
    }
    Array1::from_shape_fn(n_features, |j| {
        let reference = original.features()[j].value();
        let altered: f64 = samples
            .iter()
            .zip(weights.iter())
            .filter(|(s, w)| {
                w.is_finite()
                    && **w > 0.0
                    && s.features().get(j).map_or(false, |f| !f.value().same_as(reference))
            })
            .map(|(_, w)| *w)
            .sum();
        let p = altered / total;
        (1.0 - (1.0 - 2.0 * p).abs()).clamp(0.0, 1.0)
    })
}

/// Rescales `scores[i]` for `i` in `reference` to `|s| / max|s|`, so every rescaled
/// score lies in [0, 1]. All-zero scores stay zero.
pub fn normalize_scores(scores: &mut Array1<f64>, reference: &[usize]) {
    let max = reference
        .iter()
        .map(|&i| scores[i].abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    for &i in reference {
        let s = scores[i].abs();
        scores[i] = if max > 0.0 && s.is_finite() { s / max } else { 0.0 };
    }
}
