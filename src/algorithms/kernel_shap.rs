// src/algorithms/kernel_shap.rs

use crate::core::{Dataset, ExplainError, PerturbationContext, PredictionInput, Result};
use crate::runtime::Executor;
use crate::utils::matrix_from_prediction_inputs;

pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Transform between model output space and the additive attribution space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Identity,
    Logit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelShapSamples {
    /// Let the estimator pick a sample count from the feature count.
    #[default]
    Auto,
    Fixed(usize),
}

/// Validated configuration for the Kernel SHAP explainer.
#[derive(Debug, Clone)]
pub struct ShapConfig {
    link: LinkType,
    background: Vec<PredictionInput>,
    background_matrix: Dataset,
    perturbation_context: PerturbationContext,
    executor: Executor,
    n_samples: KernelShapSamples,
    confidence: f64,
}

impl ShapConfig {
    pub fn builder() -> ShapConfigBuilder {
        ShapConfigBuilder::default()
    }

    pub fn link(&self) -> LinkType {
        self.link
    }

    pub fn background(&self) -> &[PredictionInput] {
        &self.background
    }

    /// `background` as a matrix: one row per input, one column per feature.
    pub fn background_matrix(&self) -> &Dataset {
        &self.background_matrix
    }

    pub fn perturbation_context(&self) -> &PerturbationContext {
        &self.perturbation_context
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Fixed sample count, or `None` when left to the estimator.
    pub fn n_samples(&self) -> Option<usize> {
        match self.n_samples {
            KernelShapSamples::Auto => None,
            KernelShapSamples::Fixed(n) => Some(n),
        }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShapConfigBuilder {
    link: Option<LinkType>,
    background: Option<Vec<PredictionInput>>,
    perturbation_context: Option<PerturbationContext>,
    executor: Option<Executor>,
    n_samples: KernelShapSamples,
    confidence: Option<f64>,
}

impl ShapConfigBuilder {
    pub fn with_link(mut self, link: LinkType) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_background(mut self, background: Vec<PredictionInput>) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_pc(mut self, ctx: PerturbationContext) -> Self {
        self.perturbation_context = Some(ctx);
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = KernelShapSamples::Fixed(n_samples);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// Fails with `ExplainError::InvalidArgument` when the link or the background is
    /// missing, the background is empty, the confidence lies outside (0, 1), or a fixed
    /// sample count of 0 is requested.
    pub fn build(self) -> Result<ShapConfig> {
        let link = self
            .link
            .ok_or_else(|| ExplainError::invalid_argument("ShapConfig requires a link type"))?;
        let background = self.background.ok_or_else(|| {
            ExplainError::invalid_argument("ShapConfig requires a background dataset")
        })?;
        if background.is_empty() {
            return Err(ExplainError::invalid_argument(
                "ShapConfig background dataset cannot be empty",
            ));
        }
        let confidence = self.confidence.unwrap_or(DEFAULT_CONFIDENCE);
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ExplainError::invalid_argument(format!(
                "confidence must lie in (0, 1), got {}",
                confidence
            )));
        }
        if self.n_samples == KernelShapSamples::Fixed(0) {
            return Err(ExplainError::invalid_argument("n_samples must be at least 1"));
        }
        let background_matrix = matrix_from_prediction_inputs(&background)?;
        let executor = match self.executor {
            Some(executor) => executor,
            None => Executor::shared()?,
        };
        Ok(ShapConfig {
            link,
            background,
            background_matrix,
            perturbation_context: self
                .perturbation_context
                .unwrap_or_else(|| PerturbationContext::from_entropy(0)),
            executor,
            n_samples: self.n_samples,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Feature;

    fn background() -> Vec<PredictionInput> {
        let pi = PredictionInput::new(vec![
            Feature::numerical("f", 1.0),
            Feature::numerical("f", 2.0),
        ]);
        vec![pi.clone(), pi]
    }

    #[test]
    fn recovers_every_setting() {
        let pc = PerturbationContext::new(0, 0);
        let executor = Executor::shared().unwrap();
        let config = ShapConfig::builder()
            .with_link(LinkType::Identity)
            .with_background(background())
            .with_pc(pc.clone())
            .with_executor(executor.clone())
            .with_n_samples(100)
            .with_confidence(0.99)
            .build()
            .unwrap();
        assert_eq!(config.link(), LinkType::Identity);
        assert_eq!(config.n_samples(), Some(100));
        assert_eq!(config.confidence(), 0.99);
        assert_eq!(config.perturbation_context().seed(), pc.seed());
        assert_eq!(
            config.perturbation_context().no_of_perturbations(),
            pc.no_of_perturbations()
        );
        assert!(config.executor().same_as(&executor));
        assert_eq!(config.background(), background().as_slice());
        assert_eq!(
            config.background_matrix(),
            &matrix_from_prediction_inputs(&background()).unwrap()
        );
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ShapConfig::builder()
            .with_link(LinkType::Logit)
            .with_background(background())
            .build()
            .unwrap();
        assert_eq!(config.link(), LinkType::Logit);
        assert_eq!(config.n_samples(), None);
        assert_eq!(config.confidence(), DEFAULT_CONFIDENCE);
        assert_eq!(config.background(), background().as_slice());
        assert_eq!(
            config.background_matrix(),
            &matrix_from_prediction_inputs(&background()).unwrap()
        );
        assert!(config.executor().same_as(&Executor::shared().unwrap()));
    }

    #[test]
    fn mandatory_fields_are_enforced() {
        let link_no_bg = ShapConfig::builder().with_link(LinkType::Identity).build();
        let bg_no_link = ShapConfig::builder().with_background(background()).build();
        assert!(matches!(link_no_bg, Err(ExplainError::InvalidArgument(_))));
        assert!(matches!(bg_no_link, Err(ExplainError::InvalidArgument(_))));
    }

    #[test]
    fn empty_background_is_rejected() {
        let empty_bg = ShapConfig::builder()
            .with_link(LinkType::Identity)
            .with_background(Vec::new())
            .build();
        assert!(matches!(empty_bg, Err(ExplainError::InvalidArgument(_))));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let base = ShapConfig::builder()
            .with_link(LinkType::Identity)
            .with_background(background());
        assert!(base.clone().with_confidence(1.0).build().is_err());
        assert!(base.clone().with_confidence(0.0).build().is_err());
        assert!(base.with_n_samples(0).build().is_err());
    }

    #[test]
    fn ragged_background_is_rejected() {
        let ragged = vec![
            PredictionInput::new(vec![Feature::numerical("a", 1.0)]),
            PredictionInput::new(vec![Feature::numerical("a", 1.0), Feature::numerical("b", 2.0)]),
        ];
        let result = ShapConfig::builder()
            .with_link(LinkType::Identity)
            .with_background(ragged)
            .build();
        assert!(matches!(result, Err(ExplainError::IncompatibleDimensions(_))));
    }
}
