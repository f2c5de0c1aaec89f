use crate::errors::{PipelineError, PipelineResult};
use std::path::Path;

/// Lines announcing the reference and defect images, in submission order.
pub const IMAGE_PLACEHOLDERS: &str = "Image-1: <image>\nImage-2: <image>\n";

/// Token in the template replaced by the item's object type.
pub const OBJECT_TYPE_TOKEN: &str = "{object_type}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::InputRead {
            what: "prompt template",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    /// Full prompt for one item, image placeholders first.
    pub fn render(&self, object_type: &str) -> String {
        let body = self.text.replace(OBJECT_TYPE_TOKEN, object_type);
        format!("{IMAGE_PLACEHOLDERS}{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_object_type_and_prefixes_images() {
        let tpl = PromptTemplate::new(
            "Compare the {object_type} in Image-2 with the normal {object_type} in Image-1.",
        );
        assert_eq!(
            tpl.render("zipper"),
            "Image-1: <image>\nImage-2: <image>\n\
             Compare the zipper in Image-2 with the normal zipper in Image-1."
        );
    }

    #[test]
    fn template_without_token_is_kept_verbatim() {
        let tpl = PromptTemplate::new("Answer in JSON.");
        assert!(tpl.render("pill").ends_with("Answer in JSON."));
    }

    #[test]
    fn missing_template_is_fatal() {
        let err = PromptTemplate::load(Path::new("/nonexistent/ad_prompt.txt")).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InputRead {
                what: "prompt template",
                ..
            }
        ));
    }
}
