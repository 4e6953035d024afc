pub mod kernel_shap;
pub mod lime;

pub use kernel_shap::{KernelShapSamples, LinkType, ShapConfig, ShapConfigBuilder};
pub use lime::{FeatureSelectionStrategy, LimeConfig, LimeExplainer, SaliencyMap};
