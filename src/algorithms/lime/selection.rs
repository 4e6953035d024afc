// src/algorithms/lime/selection.rs

use ndarray::{Array1, ArrayView1, ArrayView2};
use tracing::trace;

use crate::algorithms::lime::regression::{LinearFit, WeightedLinearRegressor};
use crate::core::Result;

/// Share of features kept by default when no explicit count is configured.
pub const DEFAULT_SELECTION_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSelectionStrategy {
    /// Keep the `k` features with the largest absolute coefficient of the full fit.
    #[default]
    HighestWeights,
    /// Greedily grow a feature set, re-fitting once per candidate.
    ForwardSelection,
}

/// Number of features to keep out of `n_features`: `requested` when given, else
/// `round(0.6 * n_features)`, clamped to `[1, n_features]`.
pub fn selection_size(n_features: usize, requested: Option<usize>) -> usize {
    if n_features == 0 {
        return 0;
    }
    let k = requested
        .unwrap_or_else(|| (DEFAULT_SELECTION_FRACTION * n_features as f64).round() as usize);
    k.clamp(1, n_features)
}

/// Outcome of a selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Coefficient per original feature; zero for features never fitted.
    pub coefficients: Array1<f64>,
    /// Kept feature indices, ascending (original input order).
    pub retained: Vec<usize>,
    /// Indices whose coefficients come from the same fit. Used as the reference set
    /// when scores are normalised.
    pub fitted: Vec<usize>,
}

/// Keeps all features of `full_fit`.
pub fn no_selection(full_fit: &LinearFit) -> Selection {
    let all: Vec<usize> = (0..full_fit.coefficients.len()).collect();
    Selection {
        coefficients: full_fit.coefficients.clone(),
        retained: all.clone(),
        fitted: all,
    }
}

/// Top `k` features by `|coefficient|`; ties keep original order. Surviving
/// coefficients are exactly those of the full fit.
pub fn highest_weights(full_fit: &LinearFit, k: usize) -> Selection {
    let coefficients = &full_fit.coefficients;
    let mut ranked: Vec<usize> = (0..coefficients.len()).collect();
    // Stable sort: equal magnitudes keep index order.
    ranked.sort_by(|&a, &b| coefficients[b].abs().total_cmp(&coefficients[a].abs()));
    let mut retained: Vec<usize> = ranked.into_iter().take(k).collect();
    retained.sort_unstable();
    Selection {
        coefficients: coefficients.clone(),
        retained,
        fitted: (0..coefficients.len()).collect(),
    }
}

/// Greedy forward selection: start from the intercept-only fit and repeatedly add the
/// candidate whose inclusion gives the lowest weighted residual error, until `k`
/// features are chosen.
///
/// A candidate that leaves the error unchanged is still added, so uninformative
/// features fill the remaining slots up to `k`. The loop stops early only if every
/// remaining candidate would make the fit strictly worse, which can happen under ridge
/// regularization. Retained coefficients come from the final re-fit on the chosen
/// subset.
pub fn forward_selection(
    regressor: &WeightedLinearRegressor,
    features: ArrayView2<f64>,
    target: ArrayView1<f64>,
    weights: ArrayView1<f64>,
    k: usize,
) -> Result<Selection> {
    let n_features = features.ncols();
    let mut chosen: Vec<usize> = Vec::with_capacity(k);
    let mut current = regressor.fit_columns(features, target, weights, &chosen)?;
    let mut current_error = residual_error(regressor, &current);

    while chosen.len() < k.min(n_features) {
        let mut best: Option<(usize, LinearFit, f64)> = None;
        for candidate in (0..n_features).filter(|c| !chosen.contains(c)) {
            let mut columns = chosen.clone();
            columns.push(candidate);
            let fit = regressor.fit_columns(features, target, weights, &columns)?;
            let error = residual_error(regressor, &fit);
            let better = match &best {
                None => true,
                Some((_, _, best_error)) => error < *best_error,
            };
            if better {
                best = Some((candidate, fit, error));
            }
        }
        let Some((candidate, fit, error)) = best else {
            break;
        };
        if error > current_error + 1e-12 * current_error.abs().max(1.0) {
            trace!(candidate, error, current_error, "forward selection stopped");
            break;
        }
        chosen.push(candidate);
        current = fit;
        current_error = error;
    }

    let mut coefficients = Array1::zeros(n_features);
    for (slot, &feature) in chosen.iter().enumerate() {
        coefficients[feature] = current.coefficients[slot];
    }
    let mut retained = chosen;
    retained.sort_unstable();
    Ok(Selection {
        coefficients,
        fitted: retained.clone(),
        retained,
    })
}

/// Weighted SSE, plus the ridge penalty when the regressor carries one so that the
/// criterion matches the objective being minimised.
fn residual_error(regressor: &WeightedLinearRegressor, fit: &LinearFit) -> f64 {
    let penalty = regressor.regularization() * fit.coefficients.dot(&fit.coefficients);
    let error = fit.weighted_sse + penalty;
    if error.is_nan() {
        f64::INFINITY
    } else {
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Axis};

    fn fit_of(coefficients: Array1<f64>) -> LinearFit {
        LinearFit {
            coefficients,
            intercept: 0.0,
            weighted_sse: 0.0,
            r_squared: 1.0,
        }
    }

    #[test]
    fn default_size_is_sixty_percent() {
        assert_eq!(selection_size(10, None), 6);
        assert_eq!(selection_size(5, None), 3);
        assert_eq!(selection_size(1, None), 1);
        assert_eq!(selection_size(0, None), 0);
        assert_eq!(selection_size(5, Some(3)), 3);
        assert_eq!(selection_size(5, Some(50)), 5);
    }

    #[test]
    fn highest_weights_keeps_largest_magnitudes_in_input_order() {
        let fit = fit_of(array![0.1, -5.0, 0.3, 2.0, -0.3]);
        let selection = highest_weights(&fit, 3);
        assert_eq!(selection.retained, vec![1, 2, 3]);
        assert_eq!(selection.coefficients, fit.coefficients);
    }

    #[test]
    fn highest_weights_ties_prefer_earlier_features() {
        let fit = fit_of(array![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(highest_weights(&fit, 2).retained, vec![0, 1]);
    }

    fn two_signal_problem() -> (Array2<f64>, Array1<f64>, Array1<f64>) {
        let x = array![
            [1.0, 0.0, 3.0, 0.5],
            [0.0, 1.0, 1.0, 0.1],
            [2.0, 2.0, 0.0, 0.9],
            [1.0, 3.0, 2.0, 0.2],
            [3.0, 1.0, 1.0, 0.4],
            [0.0, 2.0, 4.0, 0.8]
        ];
        let y = x.map_axis(Axis(1), |row| 3.0 * row[0] - 2.0 * row[2]);
        (x, y, Array1::from_elem(6, 1.0))
    }

    #[test]
    fn forward_selection_starts_from_intercept_only_error() {
        // No single column fits exactly, the first pick must still beat the mean-only fit.
        let (x, y, w) = two_signal_problem();
        let regressor = WeightedLinearRegressor::default();
        let selection = forward_selection(&regressor, x.view(), y.view(), w.view(), 1).unwrap();
        assert_eq!(selection.retained, vec![0]);
        assert_ne!(selection.coefficients[0], 0.0);
    }

    #[test]
    fn forward_selection_finds_informative_columns() {
        let (x, y, w) = two_signal_problem();
        let regressor = WeightedLinearRegressor::default();
        let selection = forward_selection(&regressor, x.view(), y.view(), w.view(), 2).unwrap();
        assert_eq!(selection.retained, vec![0, 2]);
        assert!((selection.coefficients[0] - 3.0).abs() < 1e-9);
        assert!((selection.coefficients[2] + 2.0).abs() < 1e-9);
        assert_eq!(selection.coefficients[1], 0.0);
        assert_eq!(selection.fitted, vec![0, 2]);
    }

    #[test]
    fn forward_selection_fills_requested_size() {
        let x = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [2.0, 0.0, 0.0]];
        let y = array![1.0, 0.0, 1.0, 2.0];
        let w = Array1::from_elem(4, 1.0);
        let regressor = WeightedLinearRegressor::default();
        let selection = forward_selection(&regressor, x.view(), y.view(), w.view(), 3).unwrap();
        assert_eq!(selection.retained.len(), 3);
    }
}
