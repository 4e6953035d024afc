// src/utils/matrix.rs
use crate::core::{Dataset, ExplainError, PredictionInput, Result};

/// Numeric matrix form of a batch of inputs: row `i` is input `i`, column `j` its `j`-th
/// feature, in input order. Non-numeric values use [`crate::core::Value::as_number`].
pub fn matrix_from_prediction_inputs(inputs: &[PredictionInput]) -> Result<Dataset> {
    let n_cols = inputs.first().map(|input| input.len()).unwrap_or(0);
    let mut values = Vec::with_capacity(inputs.len() * n_cols);
    for (row, input) in inputs.iter().enumerate() {
        if input.len() != n_cols {
            return Err(ExplainError::IncompatibleDimensions(format!(
                "input {} has {} features, expected {}.",
                row,
                input.len(),
                n_cols
            )));
        }
        values.extend(input.features().iter().map(|f| f.value().as_number()));
    }
    Ok(Dataset::from_shape_vec((inputs.len(), n_cols), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Feature;
    use ndarray::array;

    #[test]
    fn rows_follow_input_order() {
        let inputs = vec![
            PredictionInput::new(vec![Feature::numerical("a", 1.0), Feature::boolean("b", true)]),
            PredictionInput::new(vec![Feature::numerical("a", 3.0), Feature::boolean("b", false)]),
        ];
        let matrix = matrix_from_prediction_inputs(&inputs).unwrap();
        assert_eq!(matrix, array![[1.0, 1.0], [3.0, 0.0]]);
    }

    #[test]
    fn ragged_inputs_are_rejected() {
        let inputs = vec![
            PredictionInput::new(vec![Feature::numerical("a", 1.0)]),
            PredictionInput::new(vec![]),
        ];
        assert!(matches!(
            matrix_from_prediction_inputs(&inputs),
            Err(ExplainError::IncompatibleDimensions(_))
        ));
    }

    #[test]
    fn empty_batch_is_empty_matrix() {
        let matrix = matrix_from_prediction_inputs(&[]).unwrap();
        assert_eq!(matrix.dim(), (0, 0));
    }
}
