// src/algorithms/lime/explainer.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use ndarray::Array1;
use tracing::{debug, trace};

use crate::algorithms::lime::config::LimeConfig;
use crate::algorithms::lime::regression::{encode_samples, encode_target, WeightedLinearRegressor};
use crate::algorithms::lime::sampler::perturb_samples;
use crate::algorithms::lime::selection::{
    forward_selection, highest_weights, no_selection, selection_size, FeatureSelectionStrategy,
};
use crate::algorithms::lime::weighting::{
    normalize_scores, proximity_weights, sparse_balance_penalties,
};
use crate::config::Config;
use crate::core::{
    ExplainError, FeatureImportance, Prediction, PredictionInput, PredictionOutput, Result,
    Saliency,
};
use crate::runtime::{Executor, ExplanationHandle};
use crate::traits::PredictionProvider;

/// Explanations keyed by output name.
pub type SaliencyMap = BTreeMap<String, Saliency>;

/// LIME explainer: perturbs the input, queries the model once with the whole batch,
/// and fits a proximity-weighted linear model per output.
#[derive(Debug, Clone)]
pub struct LimeExplainer {
    config: LimeConfig,
    prediction_timeout: Duration,
    executor: Option<Executor>,
}

impl Default for LimeExplainer {
    fn default() -> Self {
        LimeExplainer::new(LimeConfig::default())
    }
}

impl LimeExplainer {
    pub fn new(config: LimeConfig) -> Self {
        LimeExplainer {
            config,
            prediction_timeout: Config::global().async_timeout(),
            executor: None,
        }
    }

    /// Bound on the batched model call.
    pub fn with_prediction_timeout(mut self, timeout: Duration) -> Self {
        self.prediction_timeout = timeout;
        self
    }

    /// Runtime to spawn explanations on. Defaults to the caller's runtime, else the
    /// shared pool.
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn config(&self) -> &LimeConfig {
        &self.config
    }

    pub fn prediction_timeout(&self) -> Duration {
        self.prediction_timeout
    }

    /// Starts explaining `prediction` in the background.
    ///
    /// Validation happens before anything is scheduled: an input without features
    /// fails here with `ExplainError::LocalExplanation`.
    pub fn explain_async<M>(
        &self,
        prediction: &Prediction,
        model: Arc<M>,
    ) -> Result<ExplanationHandle<SaliencyMap>>
    where
        M: PredictionProvider + ?Sized + 'static,
    {
        self.validate(prediction)?;
        let executor = match &self.executor {
            Some(executor) => executor.clone(),
            None => Executor::current_or_shared()?,
        };
        let config = self.config.clone();
        let timeout = self.prediction_timeout;
        let prediction = prediction.clone();
        Ok(ExplanationHandle::spawn(&executor, async move {
            run(&config, timeout, &prediction, &*model).await
        }))
    }

    /// Explains `prediction` on the caller's task.
    pub async fn explain<M>(&self, prediction: &Prediction, model: &M) -> Result<SaliencyMap>
    where
        M: PredictionProvider + ?Sized,
    {
        self.validate(prediction)?;
        run(&self.config, self.prediction_timeout, prediction, model).await
    }

    fn validate(&self, prediction: &Prediction) -> Result<()> {
        if prediction.input().is_empty() {
            return Err(ExplainError::empty_input());
        }
        self.config.validate()
    }
}

async fn run<M>(
    config: &LimeConfig,
    timeout: Duration,
    prediction: &Prediction,
    model: &M,
) -> Result<SaliencyMap>
where
    M: PredictionProvider + ?Sized,
{
    let original = prediction.input();
    let n_features = original.len();

    // Each run replays the configured context from its initial state.
    let mut ctx = config.perturbation_context().clone();
    let samples = perturb_samples(original, &mut ctx, config.samples(), config.data_distribution());
    debug!(samples = samples.len(), features = n_features, "perturbed inputs generated");

    let predictions = predict(model, &samples, timeout).await?;

    let weights = proximity_weights(original, &samples);
    let design = encode_samples(original, &samples)?;
    let penalties = if config.is_penalize_balance_sparse() {
        sparse_balance_penalties(original, &samples, &weights)
    } else {
        Array1::ones(n_features)
    };
    let regressor = WeightedLinearRegressor::new(config.regularization());
    let k = selection_size(n_features, config.no_of_features());

    let mut saliencies = SaliencyMap::new();
    for output in prediction.output().outputs() {
        let target = encode_target(output, &predictions)?;
        let full_fit = regressor.fit(design.view(), target.view(), weights.view())?;
        let selection = match (config.is_feature_selection(), config.feature_selection_strategy()) {
            (false, _) => no_selection(&full_fit),
            (true, FeatureSelectionStrategy::HighestWeights) => highest_weights(&full_fit, k),
            (true, FeatureSelectionStrategy::ForwardSelection) => {
                forward_selection(&regressor, design.view(), target.view(), weights.view(), k)?
            }
        };
        trace!(
            output = output.name(),
            r_squared = full_fit.r_squared,
            retained = selection.retained.len(),
            "local model fitted"
        );

        let mut scores = &selection.coefficients * &penalties;
        if config.is_normalize_weights() {
            normalize_scores(&mut scores, &selection.fitted);
        }
        let importances = selection
            .retained
            .iter()
            .map(|&i| FeatureImportance::new(original.features()[i].clone(), scores[i]))
            .collect();
        saliencies.insert(output.name().to_string(), Saliency::new(output.clone(), importances));
    }
    debug!(outputs = saliencies.len(), "explanation complete");
    Ok(saliencies)
}

async fn predict<M>(
    model: &M,
    samples: &[PredictionInput],
    timeout: Duration,
) -> Result<Vec<PredictionOutput>>
where
    M: PredictionProvider + ?Sized,
{
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let outputs = tokio::time::timeout(timeout, model.predict_async(samples.to_vec()))
        .await
        .map_err(|_| ExplainError::Timeout(format!("model did not answer within {:?}", timeout)))??;
    if outputs.len() != samples.len() {
        return Err(ExplainError::IncompatibleDimensions(format!(
            "model returned {} outputs for {} inputs.",
            outputs.len(),
            samples.len()
        )));
    }
    Ok(outputs)
}
