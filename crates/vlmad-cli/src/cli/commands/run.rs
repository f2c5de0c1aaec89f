use super::super::args::RunArgs;
use crate::exit_codes;
use std::sync::Arc;
use tracing::{info, warn};
use vlmad_core::cache::output::JsonOutput;
use vlmad_core::cache::CacheStore;
use vlmad_core::dataset::{load_dataset, DEFAULT_REFERENCE_COUNT};
use vlmad_core::engine::{BatchProcessor, RetryController};
use vlmad_core::judge::PromptTemplate;
use vlmad_core::providers::image::FsImageLoader;
use vlmad_core::providers::vlm::load_model;
use vlmad_core::report::progress::{format_progress_line, ProgressEvent, ProgressSink};

/// Exits 0 even when items were dropped; the dropped count is logged.
pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let config = args.run_config();
    config.validate()?;

    let prompt = PromptTemplate::load(&args.prompt_template)?;
    let dataset = load_dataset(&args.dataset, DEFAULT_REFERENCE_COUNT)?;
    let cache = CacheStore::load(&args.cache)?;
    let output = JsonOutput::new(&args.output);

    let model = load_model(&args.model.spec())?;
    info!(
        provider = model.provider_name(),
        model = %args.model.model,
        dataset = %args.dataset.display(),
        output = %output.path().display(),
        "model ready"
    );

    let progress: ProgressSink =
        Arc::new(|ev: ProgressEvent| info!("{}", format_progress_line(ev)));
    let processor = BatchProcessor::new(model.as_ref(), &FsImageLoader, &prompt, config.logging);
    let summary = RetryController::new(processor, &cache, &output, &config)
        .with_progress(progress)
        .run(dataset)
        .await?;

    info!(
        selected = summary.selected_items,
        cached = summary.cached_items,
        succeeded = summary.succeeded,
        retry_rounds = summary.retry_rounds,
        "finished"
    );
    if !summary.is_complete() {
        warn!(
            dropped = summary.dropped.len(),
            "some items were not judged; rerun to retry them"
        );
    }
    Ok(exit_codes::SUCCESS)
}
