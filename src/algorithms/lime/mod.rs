pub mod config;
pub mod explainer;
pub mod regression;
pub mod sampler;
pub mod selection;
pub mod weighting;

pub use config::LimeConfig;
pub use explainer::{LimeExplainer, SaliencyMap};
pub use regression::{LinearFit, WeightedLinearRegressor};
pub use selection::FeatureSelectionStrategy;
