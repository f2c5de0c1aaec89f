//! Main pass plus bounded retry rounds, persisting after productive batches.

use super::batch::BatchProcessor;
use crate::cache::output::JsonOutput;
use crate::cache::CacheStore;
use crate::config::RunConfig;
use crate::dataset::leading_fraction;
use crate::errors::PipelineResult;
use crate::model::{CacheEntry, Judgement, ResolvedItem};
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::RunSummary;
use tracing::{info, warn};

/// Accumulated run state, threaded through the passes.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Entries inherited from the cache; always written first.
    pub cached: Vec<CacheEntry>,
    /// Judgements produced by this run, in completion order.
    pub processed: Vec<Judgement>,
    /// Items waiting for another attempt.
    pub carry_over: Vec<ResolvedItem>,
    pub retry_round: u32,
}

impl RunState {
    pub fn new(cache: &CacheStore) -> Self {
        Self {
            cached: cache.entries().to_vec(),
            ..Default::default()
        }
    }
}

pub struct RetryController<'a> {
    processor: BatchProcessor<'a>,
    cache: &'a CacheStore,
    output: &'a JsonOutput,
    config: &'a RunConfig,
    progress: Option<ProgressSink>,
}

impl<'a> RetryController<'a> {
    pub fn new(
        processor: BatchProcessor<'a>,
        cache: &'a CacheStore,
        output: &'a JsonOutput,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            processor,
            cache,
            output,
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Judge every uncached item of `dataset`. Per-item failures never abort
    /// the run; only invalid config and output write failures do.
    pub async fn run(&self, dataset: Vec<ResolvedItem>) -> PipelineResult<RunSummary> {
        self.config.validate()?;

        let mut summary = RunSummary {
            dataset_items: dataset.len(),
            ..Default::default()
        };
        let selected = leading_fraction(dataset, self.config.fraction);
        summary.selected_items = selected.len();
        let remaining = self.cache.filter_uncached(selected);
        summary.cached_items = summary.selected_items - remaining.len();
        info!(
            selected = summary.selected_items,
            cached = summary.cached_items,
            remaining = remaining.len(),
            batch_size = self.config.batch_size,
            "starting run"
        );

        let state = RunState::new(self.cache);
        let state = self.main_pass(state, remaining, &mut summary).await?;
        let state = self.retry_pass(state, &mut summary).await?;

        summary.succeeded = state.processed.len();
        summary.retry_rounds = state.retry_round;
        summary.dropped = state
            .carry_over
            .iter()
            .map(|item| item.key().to_string())
            .collect();

        if summary.dropped.is_empty() {
            info!(succeeded = summary.succeeded, "run complete");
        } else {
            warn!(
                retry_rounds = summary.retry_rounds,
                remaining = summary.dropped.len(),
                "failed to process the remaining batch"
            );
        }
        Ok(summary)
    }

    async fn main_pass(
        &self,
        mut state: RunState,
        remaining: Vec<ResolvedItem>,
        summary: &mut RunSummary,
    ) -> PipelineResult<RunState> {
        let batches = into_batches(remaining, self.config.batch_size);
        let total = batches.len();

        for (i, batch) in batches.into_iter().enumerate() {
            // Re-check against the startup cache.
            let batch = self.cache.filter_uncached(batch);
            if !batch.is_empty() {
                let submitted = batch.len();
                info!(batch = i + 1, total, len = submitted, "processing batch");

                let outcome = self.processor.process(batch).await;
                summary.batches_run += 1;
                summary.batch_invocations += 1;

                // Against the submitted length, not batch_size: a short tail or a
                // cache-trimmed batch that fails completely still counts.
                if outcome.unprocessed.len() == submitted {
                    warn!(batch = i + 1, len = submitted, "entire batch failed; carrying it over");
                }
                let productive = !outcome.processed.is_empty();
                state.processed.extend(outcome.processed);
                state.carry_over.extend(outcome.unprocessed);

                if productive {
                    self.persist(&state)?;
                }
            }
            self.emit_progress(i + 1, total);
        }
        Ok(state)
    }

    async fn retry_pass(
        &self,
        mut state: RunState,
        summary: &mut RunSummary,
    ) -> PipelineResult<RunState> {
        while !state.carry_over.is_empty() && state.retry_round < self.config.max_retries {
            let pending = std::mem::take(&mut state.carry_over);
            info!(
                round = state.retry_round + 1,
                max = self.config.max_retries,
                pending = pending.len(),
                "retrying carried-over items"
            );

            let outcome = self.processor.process(pending).await;
            summary.batch_invocations += 1;
            state.carry_over = outcome.unprocessed;
            state.processed.extend(outcome.processed);
            self.persist(&state)?;
            state.retry_round += 1;
        }
        Ok(state)
    }

    fn persist(&self, state: &RunState) -> PipelineResult<()> {
        self.output.write(&state.cached, &state.processed)
    }

    fn emit_progress(&self, done: usize, total: usize) {
        if let Some(sink) = &self.progress {
            sink(ProgressEvent { done, total });
        }
    }
}

fn into_batches(items: Vec<ResolvedItem>, size: usize) -> Vec<Vec<ResolvedItem>> {
    let mut batches = Vec::new();
    let mut iter = items.into_iter();
    loop {
        let batch: Vec<ResolvedItem> = iter.by_ref().take(size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }
    batches
}
