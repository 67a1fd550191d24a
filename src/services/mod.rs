pub mod aggregator;
pub mod blender;
pub mod features;
pub mod providers;
pub mod ranker;
pub mod scoring;

pub use blender::{Blender, DEFAULT_BEST_N};
pub use scoring::{OnnxModel, Scorer};
