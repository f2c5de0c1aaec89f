//! Vision-language model seam.

pub mod fake;
pub mod openai;

use crate::config::ModelSpec;
use crate::providers::image::EncodedImage;
use async_trait::async_trait;
use std::sync::Arc;

/// One model call: images in submission order plus the rendered prompt.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub images: Vec<EncodedImage>,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct VisionResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn respond(&self, request: &VisionRequest) -> anyhow::Result<VisionResponse>;
    fn provider_name(&self) -> &'static str;
}

/// Build the model handle described by `spec`.
pub fn load_model(spec: &ModelSpec) -> anyhow::Result<Arc<dyn VisionModel>> {
    match spec.provider.as_str() {
        "openai" => {
            let api_key = match &spec.api_key {
                Some(k) => k.clone(),
                None => std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            };
            Ok(Arc::new(openai::OpenAIVisionClient::new(
                spec.model.clone(),
                spec.api_base.clone(),
                api_key,
                spec.generation.clone(),
            )))
        }
        "fake" => {
            let mut client = fake::FakeVisionModel::new(spec.model.clone());
            if let Some(text) = &spec.fake_response {
                client = client.with_response(text.clone());
            }
            Ok(Arc::new(client))
        }
        other => anyhow::bail!("unknown model provider '{}' (expected: openai, fake)", other),
    }
}
