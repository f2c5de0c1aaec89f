//! Manifest loading and reference-image resolution.

use crate::errors::{PipelineError, PipelineResult};
use crate::model::{DatasetItem, ResolvedItem};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Placeholder in `good_img_path` that is replaced by the reference index.
pub const REFERENCE_PLACEHOLDER: &str = "000";

/// Number of reference images resolved per item.
pub const DEFAULT_REFERENCE_COUNT: usize = 1;

/// Resolve up to `count` reference images from a numbered template.
///
/// Stops at the first candidate that is not an existing file, so the result
/// may be shorter than `count` (or empty).
pub fn resolve_references(template: &str, count: usize) -> Vec<PathBuf> {
    let mut refs = Vec::new();
    for index in 0..count {
        let candidate =
            PathBuf::from(template.replace(REFERENCE_PLACEHOLDER, &format!("{index:03}")));
        if !candidate.is_file() {
            debug!(path = %candidate.display(), "reference image missing; stopping");
            break;
        }
        refs.push(candidate);
    }
    refs
}

pub fn resolve_item(item: DatasetItem, reference_count: usize) -> ResolvedItem {
    let references = resolve_references(&item.good_img_path, reference_count);
    let defect_image = PathBuf::from(&item.defect_img_path);
    ResolvedItem {
        item,
        references,
        defect_image,
    }
}

/// Read a JSON manifest and resolve every record, preserving order.
pub fn load_dataset(path: &Path, reference_count: usize) -> PipelineResult<Vec<ResolvedItem>> {
    let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::InputRead {
        what: "manifest",
        path: path.to_path_buf(),
        source,
    })?;
    let items: Vec<DatasetItem> =
        serde_json::from_str(&raw).map_err(|e| PipelineError::InputFormat {
            what: "manifest",
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let resolved: Vec<ResolvedItem> = items
        .into_iter()
        .map(|item| resolve_item(item, reference_count))
        .collect();

    let without_refs = resolved.iter().filter(|r| r.references.is_empty()).count();
    info!(
        items = resolved.len(),
        without_references = without_refs,
        "dataset ready"
    );
    Ok(resolved)
}

/// Leading `fraction` of the dataset, rounded down.
pub fn leading_fraction(mut items: Vec<ResolvedItem>, fraction: f64) -> Vec<ResolvedItem> {
    let keep = (items.len() as f64 * fraction).floor() as usize;
    items.truncate(keep.min(items.len()));
    items
}
