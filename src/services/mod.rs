pub mod actions;
pub mod candidates;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod scoring;
pub mod training;

pub use recommendations::{EngineSettings, RecommendationEngine};
