use std::path::Path;
use std::sync::Arc;

use super::fallback::fallback_classification;
use super::parser::parse_classification;
use super::prompt::build_prompt;
use super::types::{Classification, InlineImage, VisionClient};
use super::ClassifyError;

/// Vision-model classifier with a keyword fallback.
///
/// Without a client (no credential configured) every call takes the
/// fallback branch.
pub struct DebrisClassifier {
    client: Option<Arc<dyn VisionClient>>,
}

impl DebrisClassifier {
    pub fn new(client: Arc<dyn VisionClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn fallback_only() -> Self {
        Self { client: None }
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Full model verdict, or the keyword fallback if the model path failed.
    pub fn classify(&self, image_path: &Path, description: &str) -> Classification {
        match self.classify_with_model(image_path, description) {
            Ok(classification) => classification,
            Err(e) => {
                let classification = fallback_classification(description);
                tracing::warn!(
                    error = %e,
                    is_debris = classification.is_debris,
                    "Vision classification failed, using keyword fallback"
                );
                classification
            }
        }
    }

    /// The model path alone, without fallback.
    pub fn classify_with_model(
        &self,
        image_path: &Path,
        description: &str,
    ) -> Result<Classification, ClassifyError> {
        let client = self.client.as_ref().ok_or(ClassifyError::MissingCredential)?;

        let data = std::fs::read(image_path)?;
        let image = InlineImage::from_path(image_path, data);
        let prompt = build_prompt(description);

        let reply = client.generate_with_image(&prompt, &image)?;
        parse_classification(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns a fixed reply and records the last prompt/image it saw.
    struct MockVisionClient {
        reply: Result<String, fn() -> ClassifyError>,
        seen: Mutex<Option<(String, String)>>,
    }

    impl MockVisionClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn failing(err: fn() -> ClassifyError) -> Self {
            Self {
                reply: Err(err),
                seen: Mutex::new(None),
            }
        }
    }

    impl VisionClient for MockVisionClient {
        fn generate_with_image(
            &self,
            prompt: &str,
            image: &InlineImage,
        ) -> Result<String, ClassifyError> {
            *self.seen.lock().unwrap() = Some((prompt.to_string(), image.mime_type.clone()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn photo(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn model_verdict_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockVisionClient::replying(
            r#"{"is_debris": true, "categories": ["Metal", "Glass"]}"#,
        ));
        let classifier = DebrisClassifier::new(client.clone());

        // Description has no fallback keyword, so only the model could say yes.
        let result = classifier.classify(&photo(&dir, "can.png"), "rusty can");
        assert!(result.is_debris);
        assert_eq!(result.categories, vec!["Metal", "Glass"]);

        let (prompt, mime) = client.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("\"rusty can\""));
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn model_can_reject_despite_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = DebrisClassifier::new(Arc::new(MockVisionClient::replying(
            r#"{"is_debris": false, "categories": []}"#,
        )));
        let result = classifier.classify(&photo(&dir, "a.jpg"), "plastic bottle");
        assert_eq!(result, Classification::not_debris());
    }

    #[test]
    fn service_failure_falls_back_to_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = DebrisClassifier::new(Arc::new(MockVisionClient::failing(|| {
            ClassifyError::Transport("connection refused".into())
        })));

        let hit = classifier.classify(&photo(&dir, "a.jpg"), "Found a plastic bottle on the shore");
        assert_eq!(
            hit,
            Classification {
                is_debris: true,
                categories: vec!["Plastic".into()],
            }
        );

        let miss = classifier.classify(&photo(&dir, "b.jpg"), "A wooden plank");
        assert_eq!(miss, Classification::not_debris());
    }

    #[test]
    fn malformed_reply_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let classifier =
            DebrisClassifier::new(Arc::new(MockVisionClient::replying("Sure! It is plastic.")));
        let result = classifier.classify(&photo(&dir, "a.jpg"), "bottle");
        assert!(result.is_debris);
        assert_eq!(result.categories, vec!["Plastic"]);
    }

    #[test]
    fn missing_credential_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = DebrisClassifier::fallback_only();
        assert!(!classifier.has_client());

        let err = classifier
            .classify_with_model(&photo(&dir, "a.jpg"), "plastic")
            .unwrap_err();
        assert!(matches!(err, ClassifyError::MissingCredential));
        assert!(classifier.classify(&photo(&dir, "a.jpg"), "plastic").is_debris);
    }

    #[test]
    fn unreadable_image_falls_back() {
        let classifier =
            DebrisClassifier::new(Arc::new(MockVisionClient::replying(r#"{"is_debris": true, "categories": ["Other"]}"#)));
        let missing = std::path::Path::new("/nonexistent/photo.jpg");

        let err = classifier.classify_with_model(missing, "driftwood").unwrap_err();
        assert!(matches!(err, ClassifyError::ImageRead(_)));
        assert!(!classifier.classify(missing, "driftwood").is_debris);
    }
}
