pub mod cache;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod judge;
pub mod model;
pub mod providers;
pub mod report;

pub use errors::{PipelineError, PipelineResult};
