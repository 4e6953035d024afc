pub mod context;
pub mod data;
pub mod distribution;
pub mod errors;

pub use context::PerturbationContext;
pub use data::*; // Re-export common data types
pub use distribution::{DataDistribution, FeatureDistribution};
pub use errors::*;
