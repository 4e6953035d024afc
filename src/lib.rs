// src/lib.rs

//! `lime_rs` explains individual predictions of black-box models with LIME
//! (Local Interpretable Model-agnostic Explanations).
//!
//! The explainer perturbs the input of a prediction, queries the model through
//! [`PredictionProvider`], weights the perturbed samples by proximity to the original
//! input and fits a weighted linear surrogate whose coefficients become per-feature
//! saliency scores. A validated [`ShapConfig`] is provided for Kernel SHAP consumers.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod runtime;
pub mod traits;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use crate::algorithms::{
    FeatureSelectionStrategy, KernelShapSamples, LimeConfig, LimeExplainer, LinkType,
    SaliencyMap, ShapConfig, ShapConfigBuilder,
};
pub use crate::config::Config;
pub use crate::core::{
    DataDistribution, Dataset, ExplainError, Feature, FeatureDistribution, FeatureDomain,
    FeatureImportance, Output, PerturbationContext, Prediction, PredictionInput,
    PredictionOutput, Result, Saliency, Type, Value,
};
pub use crate::runtime::{Executor, ExplanationHandle};
pub use crate::traits::PredictionProvider;
pub use crate::utils::{lime_results_to_string, matrix_from_prediction_inputs};
