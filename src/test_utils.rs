// src/test_utils.rs

//! Model doubles shared by the crate's unit tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::{
    ExplainError, Feature, Output, PredictionInput, PredictionOutput, Result, Type, Value,
};
use crate::traits::PredictionProvider;

pub(crate) fn mocked_numeric_feature(i: usize) -> Feature {
    Feature::numerical(format!("f-{}", i), i as f64 + 1.0)
}

pub(crate) fn numeric_input(n: usize) -> PredictionInput {
    PredictionInput::new((0..n).map(mocked_numeric_feature).collect())
}

pub(crate) async fn predict_one<M: PredictionProvider + ?Sized>(
    model: &M,
    input: &PredictionInput,
) -> PredictionOutput {
    model
        .predict_async(vec![input.clone()])
        .await
        .unwrap()
        .pop()
        .unwrap()
}

/// Outputs `sum-but<skip>`: the sum of all numeric features except the one at `skip`.
pub(crate) struct SumSkipModel {
    pub skip: usize,
}

#[async_trait]
impl PredictionProvider for SumSkipModel {
    async fn predict_async(&self, inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>> {
        Ok(inputs
            .iter()
            .map(|input| {
                let sum: f64 = input
                    .features()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != self.skip)
                    .map(|(_, f)| f.value().as_number())
                    .sum();
                PredictionOutput::new(vec![Output::number(format!("sum-but{}", self.skip), sum)])
            })
            .collect())
    }
}

/// Outputs boolean `inside`: whether the feature sum lies within `center ± epsilon`.
pub(crate) struct SumThresholdModel {
    pub center: f64,
    pub epsilon: f64,
}

#[async_trait]
impl PredictionProvider for SumThresholdModel {
    async fn predict_async(&self, inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>> {
        Ok(inputs
            .iter()
            .map(|input| {
                let sum: f64 = input.features().iter().map(|f| f.value().as_number()).sum();
                let inside = (sum - self.center).abs() <= self.epsilon;
                let output = Output::new("inside", Type::Boolean, Value::Boolean(inside), 1.0);
                PredictionOutput::new(vec![output])
            })
            .collect())
    }
}

/// Two numeric outputs from a mixed input: the sum of the numeric features, shifted down
/// by 10 while the categorical feature at `categorical_index` is "A", and twice that.
pub(crate) struct TwoOutputSemiCategoricalModel {
    pub categorical_index: usize,
}

#[async_trait]
impl PredictionProvider for TwoOutputSemiCategoricalModel {
    async fn predict_async(&self, inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>> {
        Ok(inputs
            .iter()
            .map(|input| {
                let mut value = 0.0;
                for (i, feature) in input.features().iter().enumerate() {
                    if i == self.categorical_index {
                        if feature.value() == &Value::from("A") {
                            value -= 10.0;
                        }
                    } else {
                        value += feature.value().as_number();
                    }
                }
                PredictionOutput::new(vec![
                    Output::number("Semi-Categorical", value),
                    Output::number("Semi-Categorical*2", value * 2.0),
                ])
            })
            .collect())
    }
}

pub(crate) struct FailingModel;

#[async_trait]
impl PredictionProvider for FailingModel {
    async fn predict_async(&self, _inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>> {
        Err(ExplainError::model_prediction("model unavailable"))
    }
}

/// Delegates to `inner` after sleeping for `delay`.
pub(crate) struct SlowModel<M> {
    pub inner: M,
    pub delay: Duration,
}

#[async_trait]
impl<M: PredictionProvider> PredictionProvider for SlowModel<M> {
    async fn predict_async(&self, inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>> {
        tokio::time::sleep(self.delay).await;
        self.inner.predict_async(inputs).await
    }
}

/// Returns one output too few.
pub(crate) struct ShortModel;

#[async_trait]
impl PredictionProvider for ShortModel {
    async fn predict_async(
        &self,
        mut inputs: Vec<PredictionInput>,
    ) -> Result<Vec<PredictionOutput>> {
        inputs.pop();
        Ok(inputs.iter().map(|_| PredictionOutput::new(vec![Output::number("y", 0.0)])).collect())
    }
}
