//! Prompt construction and model-response parsing.

pub mod prompt;
pub mod response;

pub use prompt::PromptTemplate;
pub use response::{clean_response, parse_response, ParseOutcome};
