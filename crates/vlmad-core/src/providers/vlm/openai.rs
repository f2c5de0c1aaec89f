use super::{VisionModel, VisionRequest, VisionResponse};
use crate::config::GenerationConfig;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Client for OpenAI-compatible `/chat/completions` endpoints with image
/// content parts (OpenAI itself, or a vLLM / LMDeploy server hosting the VLM).
pub struct OpenAIVisionClient {
    pub model: String,
    pub api_base: String,
    pub api_key: String,
    pub generation: GenerationConfig,
    pub client: reqwest::Client,
}

impl OpenAIVisionClient {
    pub fn new(
        model: String,
        api_base: String,
        api_key: String,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            model,
            api_base,
            api_key,
            generation,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    pub(crate) fn request_body(&self, request: &VisionRequest) -> Value {
        // Images first, matching the "Image-1 / Image-2" lines of the prompt.
        let mut content: Vec<Value> = request
            .images
            .iter()
            .map(|img| {
                json!({
                    "type": "image_url",
                    "image_url": { "url": img.data_url() }
                })
            })
            .collect();
        content.push(json!({ "type": "text", "text": request.prompt }));

        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
            "temperature": self.generation.temperature,
            "max_tokens": self.generation.max_tokens,
        })
    }
}

#[async_trait]
impl VisionModel for OpenAIVisionClient {
    async fn respond(&self, request: &VisionRequest) -> anyhow::Result<VisionResponse> {
        let body = self.request_body(request);

        let mut req = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body);
        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_else(|_| String::new());
            anyhow::bail!("chat API error (status {}): {}", status, error_text);
        }

        let json: Value = resp.json().await?;
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("chat API response missing content"))?
            .to_string();

        Ok(VisionResponse {
            text,
            provider: "openai".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::image::EncodedImage;
    use std::path::PathBuf;

    #[test]
    fn body_lists_images_before_prompt() {
        let client = OpenAIVisionClient::new(
            "internvl2-8b".into(),
            "http://localhost:23333/v1/".into(),
            String::new(),
            GenerationConfig::default(),
        );
        let request = VisionRequest {
            images: vec![
                EncodedImage {
                    source: PathBuf::from("good/000.png"),
                    mime: "image/png",
                    bytes: b"ref".to_vec(),
                },
                EncodedImage {
                    source: PathBuf::from("test/crack/003.png"),
                    mime: "image/png",
                    bytes: b"defect".to_vec(),
                },
            ],
            prompt: "Image-1: <image>\nImage-2: <image>\nJudge.".into(),
        };

        let body = client.request_body(&request);
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["image_url"]["url"], "data:image/png;base64,cmVm");
        assert_eq!(content[2]["type"], "text");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(client.endpoint(), "http://localhost:23333/v1/chat/completions");
    }
}
