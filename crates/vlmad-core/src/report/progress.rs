//! Progress reporting for the main pass. The retry controller emits done/total
//! after every batch; the console layer consumes via a sink.

use std::sync::Arc;

/// One progress update: batches finished (or skipped) and total batch count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
}

/// Sink for progress events.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

#[must_use]
pub fn format_progress_line(ev: ProgressEvent) -> String {
    format!("Processing batch {}/{}...", ev.done, ev.total)
}
