use super::{VisionModel, VisionRequest, VisionResponse};
use async_trait::async_trait;

pub const DEFAULT_FAKE_RESPONSE: &str =
    r#"{"reasoning": "fake provider: no model consulted", "correctness": "correct"}"#;

/// Deterministic offline model. Answers every request with the same text.
#[derive(Debug)]
pub struct FakeVisionModel {
    model: String,
    fixed_response: Option<String>,
}

impl FakeVisionModel {
    pub fn new(model: String) -> Self {
        Self {
            model,
            fixed_response: None,
        }
    }

    pub fn with_response(mut self, response: String) -> Self {
        self.fixed_response = Some(response);
        self
    }
}

#[async_trait]
impl VisionModel for FakeVisionModel {
    async fn respond(&self, _request: &VisionRequest) -> anyhow::Result<VisionResponse> {
        let text = self
            .fixed_response
            .clone()
            .unwrap_or_else(|| DEFAULT_FAKE_RESPONSE.to_string());

        Ok(VisionResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
