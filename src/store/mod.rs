pub mod candidates;
pub mod features;

pub use candidates::{CandidateTables, POPULAR_POOL_SIZE};
pub use features::FeatureStore;
