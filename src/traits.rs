// src/traits.rs

use async_trait::async_trait;

use crate::core::{PredictionInput, PredictionOutput, Result};

/// A black-box model queried in batches.
///
/// Implementations must return exactly one `PredictionOutput` per input, in input
/// order. Any conforming implementation (a remote model, a local function, a test
/// double) can be explained.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn predict_async(&self, inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>>;
}

#[async_trait]
impl<P: PredictionProvider + ?Sized> PredictionProvider for std::sync::Arc<P> {
    async fn predict_async(&self, inputs: Vec<PredictionInput>) -> Result<Vec<PredictionOutput>> {
        (**self).predict_async(inputs).await
    }
}
