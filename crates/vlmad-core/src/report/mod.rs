pub mod progress;
pub mod summary;

pub use summary::RunSummary;
