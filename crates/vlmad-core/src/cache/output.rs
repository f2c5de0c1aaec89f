//! Output port: whole-file rewrites of the accumulated results.

use crate::errors::{PipelineError, PipelineResult};
use crate::model::{CacheEntry, Judgement, OutputRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON array writer for the run output. Writes go to a sibling temp file
/// that is renamed over the target, so readers never see a torn file.
#[derive(Debug, Clone)]
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist cached entries followed by this run's judgements.
    pub fn write(&self, cached: &[CacheEntry], processed: &[Judgement]) -> PipelineResult<()> {
        let records: Vec<OutputRecord<'_>> = cached
            .iter()
            .map(OutputRecord::Cached)
            .chain(processed.iter().map(OutputRecord::Judged))
            .collect();

        let body = to_pretty_json(&records).map_err(|e| self.write_error(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| self.write_error(format!("failed to create directory: {}", e)))?;
        }
        write_atomic(&self.path, &body).map_err(|e| self.write_error(e.to_string()))?;

        debug!(path = %self.path.display(), records = records.len(), "output persisted");
        Ok(())
    }

    fn write_error(&self, message: String) -> PipelineError {
        PipelineError::OutputWrite {
            path: self.path.clone(),
            message,
        }
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)
}
