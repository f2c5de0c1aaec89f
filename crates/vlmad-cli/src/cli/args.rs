use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vlmad_core::config::{
    GenerationConfig, ModelSpec, ResponseLogging, RunConfig, DEFAULT_API_BASE, DEFAULT_MODEL,
};

pub const DEFAULT_DATASET: &str = "datasets/MVTecAD/vlm_for_ad_dataset.json";
pub const DEFAULT_ANSWERS: &str = "./output/answer_internvl2_8b.json";
pub const DEFAULT_PROMPT_TEMPLATE: &str = "./prompt_template/ad_prompt.txt";

#[derive(Parser)]
#[command(
    name = "vlmad",
    version,
    about = "Resumable batch judging of anomaly-detection images with a vision-language model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Judge every uncached dataset item, retrying unparseable answers
    Run(RunArgs),
    /// Show how much of the dataset is already cached
    Status(StatusArgs),
}

#[derive(clap::Args, Clone, Debug)]
pub struct ModelArgs {
    /// Model identifier passed to the provider
    #[arg(long, default_value = DEFAULT_MODEL, env = "VLMAD_MODEL")]
    pub model: String,

    /// Model provider
    /// - openai: OpenAI-compatible chat completions endpoint (vLLM, LMDeploy, ...)
    /// - fake: fixed answer, no network (tests/dev)
    #[arg(long, default_value = "openai", env = "VLMAD_PROVIDER")]
    pub provider: String,

    /// Base URL of the OpenAI-compatible server
    #[arg(long, default_value = DEFAULT_API_BASE, env = "VLMAD_API_BASE")]
    pub api_base: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value_t = 0.0, env = "VLMAD_TEMPERATURE")]
    pub temperature: f32,

    #[arg(long, default_value_t = 1024, env = "VLMAD_MAX_TOKENS")]
    pub max_tokens: u32,

    /// Answer returned by the fake provider
    #[arg(long, hide = true)]
    pub fake_response: Option<String>,
}

impl ModelArgs {
    pub fn spec(&self) -> ModelSpec {
        ModelSpec {
            provider: self.provider.clone(),
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            generation: GenerationConfig {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            },
            fake_response: self.fake_response.clone(),
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// JSON manifest of dataset items
    #[arg(long, default_value = DEFAULT_DATASET, env = "VLMAD_DATASET")]
    pub dataset: PathBuf,

    /// Earlier answers; items found here are skipped (missing file = empty cache)
    #[arg(long, default_value = DEFAULT_ANSWERS, env = "VLMAD_CACHE")]
    pub cache: PathBuf,

    /// Where answers are written (may be the same file as --cache)
    #[arg(long, default_value = DEFAULT_ANSWERS, env = "VLMAD_OUTPUT")]
    pub output: PathBuf,

    /// Log every cleaned model response
    #[arg(long)]
    pub verbose: bool,

    /// Log raw and cleaned text of unparseable responses
    #[arg(long)]
    pub debug: bool,

    /// Retry rounds over items whose answer could not be parsed
    #[arg(long, default_value_t = 3, env = "VLMAD_REPEAT_NUM")]
    pub repeat_num: u32,

    /// Leading fraction of the dataset to process, in [0, 1]
    #[arg(long, default_value_t = 1.0, env = "VLMAD_FRACTION")]
    pub fraction: f64,

    #[arg(long, default_value = DEFAULT_PROMPT_TEMPLATE, env = "VLMAD_PROMPT_TEMPLATE")]
    pub prompt_template: PathBuf,

    #[arg(long, default_value_t = 1, env = "VLMAD_BATCH_SIZE")]
    pub batch_size: usize,
}

impl RunArgs {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            batch_size: self.batch_size,
            max_retries: self.repeat_num,
            fraction: self.fraction,
            logging: ResponseLogging {
                verbose: self.verbose,
                debug: self.debug,
            },
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Clone, Debug)]
pub struct StatusArgs {
    #[arg(long, default_value = DEFAULT_DATASET, env = "VLMAD_DATASET")]
    pub dataset: PathBuf,

    #[arg(long, default_value = DEFAULT_ANSWERS, env = "VLMAD_CACHE")]
    pub cache: PathBuf,

    #[arg(long, default_value_t = 1.0, env = "VLMAD_FRACTION")]
    pub fraction: f64,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}
