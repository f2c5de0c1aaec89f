//! Error types for the judging pipeline.
//!
//! Only fatal conditions are represented here. Per-item failures (unparseable
//! model output, a failed model call) never surface as errors; they move the
//! item into the retry carry-over instead.

use std::path::PathBuf;

/// Fatal pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input file (manifest, cache, prompt template) could not be read.
    #[error("failed to read {what} {path}: {source}")]
    InputRead {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file was read but its contents are malformed.
    #[error("malformed {what} {path}: {message}")]
    InputFormat {
        what: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Run configuration rejected before any work started.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Persisting the output file failed.
    #[error("failed to write output {path}: {message}")]
    OutputWrite { path: PathBuf, message: String },
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputRead { .. } | Self::InputFormat { .. } | Self::Config { .. } => 2,
            Self::OutputWrite { .. } => 3,
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
