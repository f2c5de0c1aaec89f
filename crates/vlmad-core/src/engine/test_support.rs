use crate::dataset::resolve_item;
use crate::model::{DatasetItem, ResolvedItem};
use crate::providers::image::{EncodedImage, ImageLoader};
use crate::providers::vlm::{VisionModel, VisionRequest, VisionResponse};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub(crate) const VALID: &str = r#"{"reasoning": "ok", "correctness": "pass"}"#;
pub(crate) const MALFORMED: &str = "I think it is defective";
pub(crate) const CALL_ERROR: &str = "<call error>";

/// Model whose answers are scripted per defect image. Unscripted items, or
/// items whose script ran out, get `VALID`.
#[derive(Default)]
pub(crate) struct ScriptedModel {
    scripts: Mutex<HashMap<String, VecDeque<String>>>,
    pub(crate) calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedModel {
    pub(crate) fn script(self, key: &str, answers: &[&str]) -> Self {
        self.scripts.lock().unwrap().insert(
            key.to_string(),
            answers.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub(crate) fn called_keys(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(k, _)| k.clone()).collect()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    async fn respond(&self, request: &VisionRequest) -> anyhow::Result<VisionResponse> {
        let key = request
            .images
            .last()
            .map(|img| img.source.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push((key.clone(), request.images.len()));

        let text = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|answers| answers.pop_front())
            .unwrap_or_else(|| VALID.to_string());
        if text == CALL_ERROR {
            anyhow::bail!("scripted failure for {}", key);
        }
        Ok(VisionResponse {
            text,
            provider: "scripted".to_string(),
            model: "scripted".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Loader that never touches the filesystem.
pub(crate) struct StubImages;

impl ImageLoader for StubImages {
    fn load(&self, path: &Path) -> anyhow::Result<EncodedImage> {
        Ok(EncodedImage {
            source: path.to_path_buf(),
            mime: "image/png",
            bytes: Vec::new(),
        })
    }
}

pub(crate) fn item(key: &str) -> ResolvedItem {
    resolve_item(
        DatasetItem {
            defect_img_path: key.to_string(),
            good_img_path: "absent/000.png".into(),
            object_type: "metal_nut".into(),
            extra: Default::default(),
        },
        1,
    )
}

pub(crate) fn item_with_reference(key: &str) -> ResolvedItem {
    let mut resolved = item(key);
    resolved.references = vec![PathBuf::from("good/000.png")];
    resolved
}
