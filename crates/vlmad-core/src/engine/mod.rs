//! Batch processing and the retry loop around it.

pub mod batch;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchOutcome, BatchProcessor};
pub use retry::{RetryController, RunState};
