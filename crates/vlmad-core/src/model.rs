use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// One manifest record. `defect_img_path` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub defect_img_path: String,
    /// Reference image path template; every `"000"` is replaced by the index.
    pub good_img_path: String,
    pub object_type: String,
    /// Any other manifest fields, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A dataset item with its reference images resolved against the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub item: DatasetItem,
    pub references: Vec<PathBuf>,
    pub defect_image: PathBuf,
}

impl ResolvedItem {
    pub fn key(&self) -> &str {
        &self.item.defect_img_path
    }
}

/// A record read back from a previous output file.
///
/// Only the key is typed; everything else round-trips verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub defect_img_path: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Parsed model answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub reasoning: String,
    pub correctness: Value,
}

/// A successfully judged item: the manifest record plus the verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Judgement {
    #[serde(flatten)]
    pub item: DatasetItem,
    pub reasoning: String,
    pub correctness: Value,
}

impl Judgement {
    /// Merge a verdict into a copy of `item`. Verdict fields win over
    /// same-named manifest fields.
    pub fn new(item: &DatasetItem, verdict: Verdict) -> Self {
        let mut item = item.clone();
        item.extra.retain(|key, _| key != "reasoning" && key != "correctness");
        Self {
            item,
            reasoning: verdict.reasoning,
            correctness: verdict.correctness,
        }
    }

    pub fn key(&self) -> &str {
        &self.item.defect_img_path
    }
}

/// One element of the persisted output array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OutputRecord<'a> {
    Cached(&'a CacheEntry),
    Judged(&'a Judgement),
}
