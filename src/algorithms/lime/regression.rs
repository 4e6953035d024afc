// src/algorithms/lime/regression.rs

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use tracing::trace;

use crate::core::{
    Dataset, ExplainError, Output, PredictionInput, PredictionOutput, Result, Type, Value,
};

/// Result of one weighted least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// One coefficient per fitted column, in column order.
    pub coefficients: Array1<f64>,
    pub intercept: f64,
    /// Weighted sum of squared residuals.
    pub weighted_sse: f64,
    /// Weighted coefficient of determination; 0 when the target does not vary.
    pub r_squared: f64,
}

impl LinearFit {
    fn neutral(n_coeffs: usize, intercept: f64) -> Self {
        LinearFit {
            coefficients: Array1::zeros(n_coeffs),
            intercept,
            weighted_sse: 0.0,
            r_squared: 0.0,
        }
    }
}

/// Weighted linear (optionally ridge) regression with an implicit intercept.
///
/// Minimises `sum_i w_i * (y_i - b - x_i . beta)^2 + lambda * |beta|^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedLinearRegressor {
    regularization: f64,
}

impl Default for WeightedLinearRegressor {
    fn default() -> Self {
        WeightedLinearRegressor::new(0.0)
    }
}

impl WeightedLinearRegressor {
    pub fn new(regularization: f64) -> Self {
        WeightedLinearRegressor { regularization }
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// Fits every column of `features`.
    pub fn fit(
        &self,
        features: ArrayView2<f64>,
        target: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> Result<LinearFit> {
        self.check_dimensions(features, target, weights)?;
        self.solve(features, target, weights)
    }

    /// Fits only `columns` of `features`; coefficients follow `columns` order.
    pub fn fit_columns(
        &self,
        features: ArrayView2<f64>,
        target: ArrayView1<f64>,
        weights: ArrayView1<f64>,
        columns: &[usize],
    ) -> Result<LinearFit> {
        self.check_dimensions(features, target, weights)?;
        if let Some(&bad) = columns.iter().find(|&&c| c >= features.ncols()) {
            return Err(ExplainError::IncompatibleDimensions(format!(
                "column {} requested from a design matrix with {} columns.",
                bad,
                features.ncols()
            )));
        }
        let subset = features.select(Axis(1), columns);
        self.solve(subset.view(), target, weights)
    }

    fn check_dimensions(
        &self,
        features: ArrayView2<f64>,
        target: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> Result<()> {
        if features.nrows() != target.len() || features.nrows() != weights.len() {
            return Err(ExplainError::IncompatibleDimensions(format!(
                "design matrix has {} rows, target has {}, weights have {}.",
                features.nrows(),
                target.len(),
                weights.len()
            )));
        }
        Ok(())
    }

    fn solve(
        &self,
        features: ArrayView2<f64>,
        target: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> Result<LinearFit> {
        let n_samples = features.nrows();
        let n_coeffs = features.ncols();

        // Negative or non-finite weights contribute nothing.
        let weights = weights.mapv(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
        let sum_weights = weights.sum();
        if n_samples == 0 || sum_weights <= 1e-12 {
            return Ok(LinearFit::neutral(n_coeffs, 0.0));
        }

        let y_mean = target.dot(&weights) / sum_weights;
        if n_coeffs == 0 {
            // Intercept-only model: every deviation from the weighted mean is residual.
            let centred = target.mapv(|y| y - y_mean);
            return Ok(LinearFit {
                weighted_sse: (&centred * &centred).dot(&weights),
                ..LinearFit::neutral(0, y_mean)
            });
        }
        let x_mean = features.t().dot(&weights) / sum_weights;

        // Centre on the weighted means and scale rows by sqrt(w).
        let sqrt_w = weights.mapv(f64::sqrt);
        let x_w: Array2<f64> = (&features - &x_mean) * &sqrt_w.view().insert_axis(Axis(1));
        let y_w: Array1<f64> = (&target - y_mean) * &sqrt_w;

        let coefficients = self.least_squares(&x_w, &y_w)?;

        let residuals = &y_w - &x_w.dot(&coefficients);
        let weighted_sse = residuals.dot(&residuals);
        let total = y_w.dot(&y_w);
        let r_squared = if total > 1e-12 { 1.0 - weighted_sse / total } else { 0.0 };
        let intercept = y_mean - x_mean.dot(&coefficients);

        trace!(n_samples, n_coeffs, weighted_sse, r_squared, "weighted fit");
        Ok(LinearFit {
            coefficients,
            intercept,
            weighted_sse,
            r_squared,
        })
    }

    #[cfg(not(feature = "linalg"))]
    fn least_squares(&self, x_w: &Array2<f64>, y_w: &Array1<f64>) -> Result<Array1<f64>> {
        let n_coeffs = x_w.ncols();
        let mut gram = x_w.t().dot(x_w);
        for j in 0..n_coeffs {
            gram[[j, j]] += self.regularization;
        }
        let rhs = x_w.t().dot(y_w);
        Ok(solve_symmetric(gram, rhs))
    }

    #[cfg(feature = "linalg")]
    fn least_squares(&self, x_w: &Array2<f64>, y_w: &Array1<f64>) -> Result<Array1<f64>> {
        // Using SVD based least squares; the ridge term enters as extra rows.
        use ndarray::concatenate;
        use ndarray_linalg::LeastSquaresSvd;

        let n_coeffs = x_w.ncols();
        let ridge = Array2::<f64>::eye(n_coeffs) * self.regularization.sqrt();
        let x_aug = concatenate![Axis(0), x_w.view(), ridge.view()];
        let y_aug = concatenate![Axis(0), y_w.view(), Array1::<f64>::zeros(n_coeffs).view()];
        let results = x_aug
            .least_squares(&y_aug)
            .map_err(|e| ExplainError::internal(format!("WLS solver SVD failed: {}", e)))?;
        Ok(results.solution)
    }
}

/// Solves `a x = b` for symmetric positive semi-definite `a` by Gaussian elimination
/// with partial pivoting. Columns whose pivot vanishes are dependent and get 0.
#[cfg_attr(feature = "linalg", allow(dead_code))]
fn solve_symmetric(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let n = b.len();
    let scale = (0..n).map(|i| a[[i, i]].abs()).fold(1.0_f64, f64::max);
    let tolerance = 1e-10 * scale;
    let mut free = vec![false; n];

    for k in 0..n {
        let mut pivot_row = k;
        for r in (k + 1)..n {
            if a[[r, k]].abs() > a[[pivot_row, k]].abs() {
                pivot_row = r;
            }
        }
        if a[[pivot_row, k]].abs() < tolerance {
            free[k] = true;
            continue;
        }
        if pivot_row != k {
            for c in 0..n {
                a.swap([k, c], [pivot_row, c]);
            }
            b.swap(k, pivot_row);
        }
        for r in (k + 1)..n {
            let factor = a[[r, k]] / a[[k, k]];
            if factor == 0.0 {
                continue;
            }
            for c in k..n {
                a[[r, c]] -= factor * a[[k, c]];
            }
            b[r] -= factor * b[k];
        }
    }

    let mut x = Array1::zeros(n);
    for k in (0..n).rev() {
        if free[k] {
            continue;
        }
        let mut acc = b[k];
        for j in (k + 1)..n {
            acc -= a[[k, j]] * x[j];
        }
        x[k] = acc / a[[k, k]];
    }
    x
}

/// Design matrix for a perturbed batch. Numeric features pass through (missing or
/// non-finite values read as 0); categorical and boolean features become indicators of
/// matching the original value.
pub fn encode_samples(original: &PredictionInput, samples: &[PredictionInput]) -> Result<Dataset> {
    let n_features = original.len();
    let mut values = Vec::with_capacity(samples.len() * n_features);
    for (row, sample) in samples.iter().enumerate() {
        if sample.len() != n_features {
            return Err(ExplainError::IncompatibleDimensions(format!(
                "sample {} has {} features, original has {}.",
                row,
                sample.len(),
                n_features
            )));
        }
        for (feature, reference) in sample.features().iter().zip(original.features()) {
            let encoded = match feature.feature_type() {
                Type::Number => {
                    let v = feature.value().as_number();
                    if v.is_finite() {
                        v
                    } else {
                        0.0
                    }
                }
                Type::Categorical | Type::Boolean => {
                    if feature.value().same_as(reference.value()) {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            values.push(encoded);
        }
    }
    Ok(Dataset::from_shape_vec((samples.len(), n_features), values)?)
}

/// Regression target for one output channel: numeric and boolean outputs use their
/// numeric value, categorical outputs an indicator of matching the original decision.
pub fn encode_target(original: &Output, predictions: &[PredictionOutput]) -> Result<Array1<f64>> {
    predictions
        .iter()
        .map(|prediction| {
            let output = prediction.by_name(original.name()).ok_or_else(|| {
                ExplainError::model_prediction(format!(
                    "model did not produce output '{}'",
                    original.name()
                ))
            })?;
            let value = output.value();
            let categorical =
                original.output_type() == Type::Categorical || matches!(value, Value::Text(_));
            Ok(if !categorical {
                value.as_number()
            } else if value.same_as(original.value()) {
                1.0
            } else {
                0.0
            })
        })
        .collect()
}
