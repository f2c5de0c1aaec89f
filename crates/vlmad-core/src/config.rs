use crate::errors::{PipelineError, PipelineResult};

pub const DEFAULT_MODEL: &str = "OpenGVLab/InternVL2-8B";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Controls for the batch/retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub batch_size: usize,
    /// Retry rounds over the carry-over after the main pass.
    pub max_retries: u32,
    /// Leading fraction of the dataset to process, in `[0, 1]`.
    pub fraction: f64,
    pub logging: ResponseLogging,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            max_retries: 3,
            fraction: 1.0,
            logging: ResponseLogging::default(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        if self.batch_size == 0 {
            return Err(PipelineError::config("batch size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.fraction) {
            return Err(PipelineError::config(format!(
                "fraction must be within [0, 1], got {}",
                self.fraction
            )));
        }
        Ok(())
    }
}

/// What to log about raw model responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseLogging {
    /// Log every cleaned response.
    pub verbose: bool,
    /// Log raw and cleaned text when parsing fails.
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 1024,
        }
    }
}

/// Everything needed to construct a model handle.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub provider: String, // "openai", "fake"
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub generation: GenerationConfig,
    /// Fixed answer for the fake provider.
    pub fake_response: Option<String>,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            generation: GenerationConfig::default(),
            fake_response: None,
        }
    }
}
