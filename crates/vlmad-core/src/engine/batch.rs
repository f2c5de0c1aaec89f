//! One batch through the model: prompt, images, call, parse, partition.

use crate::config::ResponseLogging;
use crate::judge::{clean_response, parse_response, ParseOutcome, PromptTemplate};
use crate::model::{Judgement, ResolvedItem};
use crate::providers::image::ImageLoader;
use crate::providers::vlm::{VisionModel, VisionRequest};
use tracing::{info, warn};

/// Partition of a batch. Every input item lands in exactly one list, and both
/// lists keep input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub unprocessed: Vec<ResolvedItem>,
    pub processed: Vec<Judgement>,
}

pub struct BatchProcessor<'a> {
    model: &'a dyn VisionModel,
    images: &'a dyn ImageLoader,
    prompt: &'a PromptTemplate,
    logging: ResponseLogging,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        model: &'a dyn VisionModel,
        images: &'a dyn ImageLoader,
        prompt: &'a PromptTemplate,
        logging: ResponseLogging,
    ) -> Self {
        Self {
            model,
            images,
            prompt,
            logging,
        }
    }

    /// First reference (if any) then the defect image.
    pub fn build_request(&self, item: &ResolvedItem) -> anyhow::Result<VisionRequest> {
        let mut images = Vec::with_capacity(2);
        if let Some(reference) = item.references.first() {
            images.push(self.images.load(reference)?);
        }
        images.push(self.images.load(&item.defect_image)?);

        Ok(VisionRequest {
            images,
            prompt: self.prompt.render(&item.item.object_type),
        })
    }

    async fn invoke(&self, item: &ResolvedItem) -> anyhow::Result<String> {
        let request = self.build_request(item)?;
        Ok(self.model.respond(&request).await?.text)
    }

    /// Run every item through the model, then parse all responses.
    pub async fn process(&self, batch: Vec<ResolvedItem>) -> BatchOutcome {
        let mut responses = Vec::with_capacity(batch.len());
        for item in &batch {
            responses.push(self.invoke(item).await);
        }

        let mut outcome = BatchOutcome::default();
        for (index, (item, response)) in batch.into_iter().zip(responses).enumerate() {
            let raw = match response {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(index, key = item.key(), error = %e, "model call failed; queued for retry");
                    outcome.unprocessed.push(item);
                    continue;
                }
            };
            if self.logging.verbose {
                info!(index, response = %clean_response(&raw), "model response");
            }

            match parse_response(&raw) {
                ParseOutcome::Parsed(verdict) => {
                    outcome.processed.push(Judgement::new(&item.item, verdict));
                }
                ParseOutcome::ParseFailed {
                    raw,
                    cleaned,
                    reason,
                } => {
                    warn!(index, key = item.key(), %reason, "error in json parsing; skipping this example");
                    if self.logging.debug {
                        warn!(index, %raw, %cleaned, "unparseable model response");
                    }
                    outcome.unprocessed.push(item);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::providers::image::FsImageLoader;

    fn template() -> PromptTemplate {
        PromptTemplate::new("Inspect the {object_type}.")
    }

    #[tokio::test]
    async fn partitions_successes_and_failures() {
        let model = ScriptedModel::default()
            .script("b.png", &[MALFORMED])
            .script("d.png", &[CALL_ERROR]);
        let prompt = template();
        let processor =
            BatchProcessor::new(&model, &StubImages, &prompt, ResponseLogging::default());

        let batch = vec![item("a.png"), item("b.png"), item("c.png"), item("d.png")];
        let outcome = processor.process(batch.clone()).await;

        assert_eq!(outcome.processed.len() + outcome.unprocessed.len(), batch.len());
        let ok: Vec<&str> = outcome.processed.iter().map(|j| j.key()).collect();
        let failed: Vec<&str> = outcome.unprocessed.iter().map(|i| i.key()).collect();
        assert_eq!(ok, vec!["a.png", "c.png"]);
        assert_eq!(failed, vec!["b.png", "d.png"]);
        assert_eq!(outcome.unprocessed[0], batch[1], "failed entries are returned unchanged");
        assert_eq!(outcome.processed[0].reasoning, "ok");
    }

    #[tokio::test]
    async fn array_answer_is_carried_over() {
        let model = ScriptedModel::default().script("a.png", &[r#"["looks fine", "pass"]"#]);
        let prompt = template();
        let processor =
            BatchProcessor::new(&model, &StubImages, &prompt, ResponseLogging::default());

        let outcome = processor.process(vec![item("a.png")]).await;
        assert!(outcome.processed.is_empty());
        assert_eq!(outcome.unprocessed[0].key(), "a.png");
    }

    #[tokio::test]
    async fn calls_model_in_batch_order() {
        let model = ScriptedModel::default();
        let prompt = template();
        let processor =
            BatchProcessor::new(&model, &StubImages, &prompt, ResponseLogging::default());

        processor
            .process(vec![item("z.png"), item("y.png"), item("x.png")])
            .await;
        assert_eq!(model.called_keys(), vec!["z.png", "y.png", "x.png"]);
    }

    #[tokio::test]
    async fn item_without_reference_is_still_submitted() {
        let model = ScriptedModel::default();
        let prompt = template();
        let processor =
            BatchProcessor::new(&model, &StubImages, &prompt, ResponseLogging::default());

        let outcome = processor
            .process(vec![item("solo.png"), item_with_reference("pair.png")])
            .await;

        assert_eq!(outcome.processed.len(), 2);
        let calls = model.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("solo.png".to_string(), 1), ("pair.png".to_string(), 2)]);
    }

    #[test]
    fn request_carries_rendered_prompt_and_image_order() {
        let model = ScriptedModel::default();
        let prompt = template();
        let processor =
            BatchProcessor::new(&model, &StubImages, &prompt, ResponseLogging::default());

        let req = processor
            .build_request(&item_with_reference("test/hole/001.png"))
            .unwrap();
        assert_eq!(req.prompt, "Image-1: <image>\nImage-2: <image>\nInspect the metal_nut.");
        let sources: Vec<String> = req
            .images
            .iter()
            .map(|i| i.source.to_string_lossy().into_owned())
            .collect();
        assert_eq!(sources, vec!["good/000.png", "test/hole/001.png"]);
    }

    #[tokio::test]
    async fn unreadable_image_is_retryable() {
        let model = ScriptedModel::default();
        let prompt = template();
        let processor =
            BatchProcessor::new(&model, &FsImageLoader, &prompt, ResponseLogging::default());

        let outcome = processor.process(vec![item("/nonexistent/defect.png")]).await;
        assert!(outcome.processed.is_empty());
        assert_eq!(outcome.unprocessed.len(), 1);
        assert!(model.called_keys().is_empty(), "model must not be called without images");
    }

    #[tokio::test]
    async fn debug_logging_does_not_change_partition() {
        let model = ScriptedModel::default().script("a.png", &[MALFORMED]);
        let prompt = template();
        let logging = ResponseLogging {
            verbose: true,
            debug: true,
        };
        let processor = BatchProcessor::new(&model, &StubImages, &prompt, logging);

        let outcome = processor.process(vec![item("a.png"), item("b.png")]).await;
        assert_eq!(outcome.unprocessed.len(), 1);
        assert_eq!(outcome.processed.len(), 1);
    }
}
