use super::super::args::{OutputFormat, StatusArgs};
use crate::exit_codes;
use serde::Serialize;
use vlmad_core::cache::CacheStore;
use vlmad_core::config::RunConfig;
use vlmad_core::dataset::{leading_fraction, load_dataset, DEFAULT_REFERENCE_COUNT};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusReport {
    pub dataset_items: usize,
    pub selected_items: usize,
    pub cached_items: usize,
    pub remaining_items: usize,
}

pub fn run(args: StatusArgs) -> anyhow::Result<i32> {
    RunConfig {
        fraction: args.fraction,
        ..Default::default()
    }
    .validate()?;

    let dataset = load_dataset(&args.dataset, DEFAULT_REFERENCE_COUNT)?;
    let cache = CacheStore::load(&args.cache)?;
    let report = build_report(dataset.len(), leading_fraction(dataset, args.fraction), &cache);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("dataset:   {}", report.dataset_items);
            println!("selected:  {}", report.selected_items);
            println!("cached:    {}", report.cached_items);
            println!("remaining: {}", report.remaining_items);
        }
    }
    Ok(exit_codes::SUCCESS)
}

fn build_report(
    dataset_items: usize,
    selected: Vec<vlmad_core::model::ResolvedItem>,
    cache: &CacheStore,
) -> StatusReport {
    let selected_items = selected.len();
    let remaining_items = cache.filter_uncached(selected).len();
    StatusReport {
        dataset_items,
        selected_items,
        cached_items: selected_items - remaining_items,
        remaining_items,
    }
}
