pub mod matrix;
pub mod report;

pub use matrix::matrix_from_prediction_inputs;
pub use report::lime_results_to_string;
