use serde::Serialize;

/// Outcome of one run, returned by the retry controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Items in the manifest.
    pub dataset_items: usize,
    /// Items left after applying the dataset fraction.
    pub selected_items: usize,
    /// Selected items skipped because the cache already had them.
    pub cached_items: usize,
    /// Main-pass batches actually submitted to the model.
    pub batches_run: usize,
    /// Batch processor invocations, main pass and retry rounds together.
    pub batch_invocations: usize,
    /// Items judged during this run.
    pub succeeded: usize,
    pub retry_rounds: u32,
    /// Keys of items given up on after the last retry round.
    pub dropped: Vec<String>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}
