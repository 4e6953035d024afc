// src/algorithms/lime/config.rs

use std::sync::Arc;

use crate::algorithms::lime::selection::FeatureSelectionStrategy;
use crate::core::{DataDistribution, ExplainError, PerturbationContext, Result};

pub const DEFAULT_NO_OF_SAMPLES: usize = 300;
pub const DEFAULT_NO_OF_PERTURBATIONS: usize = 1;

/// Configuration for the LIME explainer.
///
/// Built fluently from [`LimeConfig::default`]; each `with_*` call returns an updated
/// copy, so an existing configuration is never changed in place.
#[derive(Debug, Clone)]
pub struct LimeConfig {
    perturbation_context: PerturbationContext,
    samples: usize,
    penalize_balance_sparse: bool,
    normalize_weights: bool,
    feature_selection: bool,
    feature_selection_strategy: FeatureSelectionStrategy,
    no_of_features: Option<usize>,
    regularization: f64,
    data_distribution: Option<Arc<DataDistribution>>,
}

impl Default for LimeConfig {
    fn default() -> Self {
        LimeConfig {
            perturbation_context: PerturbationContext::from_entropy(DEFAULT_NO_OF_PERTURBATIONS),
            samples: DEFAULT_NO_OF_SAMPLES,
            penalize_balance_sparse: false,
            normalize_weights: false,
            feature_selection: true,
            feature_selection_strategy: FeatureSelectionStrategy::HighestWeights,
            no_of_features: None,
            regularization: 0.0,
            data_distribution: None,
        }
    }
}

impl LimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_perturbation_context(mut self, ctx: PerturbationContext) -> Self {
        self.perturbation_context = ctx;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_penalize_balance_sparse(mut self, penalize: bool) -> Self {
        self.penalize_balance_sparse = penalize;
        self
    }

    pub fn with_normalize_weights(mut self, normalize: bool) -> Self {
        self.normalize_weights = normalize;
        self
    }

    pub fn with_feature_selection(mut self, enabled: bool) -> Self {
        self.feature_selection = enabled;
        self
    }

    pub fn with_feature_selection_strategy(mut self, strategy: FeatureSelectionStrategy) -> Self {
        self.feature_selection_strategy = strategy;
        self
    }

    pub fn with_no_of_features(mut self, n: usize) -> Self {
        self.no_of_features = Some(n);
        self
    }

    /// Ridge penalty for the local regression; 0 means plain weighted least squares.
    pub fn with_regularization(mut self, lambda: f64) -> Self {
        self.regularization = lambda;
        self
    }

    pub fn with_data_distribution(mut self, distribution: DataDistribution) -> Self {
        self.data_distribution = Some(Arc::new(distribution));
        self
    }

    pub fn perturbation_context(&self) -> &PerturbationContext {
        &self.perturbation_context
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_penalize_balance_sparse(&self) -> bool {
        self.penalize_balance_sparse
    }

    pub fn is_normalize_weights(&self) -> bool {
        self.normalize_weights
    }

    pub fn is_feature_selection(&self) -> bool {
        self.feature_selection
    }

    pub fn feature_selection_strategy(&self) -> FeatureSelectionStrategy {
        self.feature_selection_strategy
    }

    pub fn no_of_features(&self) -> Option<usize> {
        self.no_of_features
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    pub fn data_distribution(&self) -> Option<&DataDistribution> {
        self.data_distribution.as_deref()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(ExplainError::invalid_argument(format!(
                "regularization must be a finite, non-negative number, got {}",
                self.regularization
            )));
        }
        if self.no_of_features == Some(0) {
            return Err(ExplainError::invalid_argument("no_of_features must be at least 1"));
        }
        Ok(())
    }
}
