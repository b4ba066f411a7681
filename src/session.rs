use crate::{
    encoder::{ImageEncoder, UploadedFile},
    error::{Result, ThumbnailError},
    models::{GenerationOutcome, ReferenceImage},
};
use std::sync::Arc;
use tokio::sync::watch;

/// User-facing message when a batch of uploads cannot be encoded.
pub const UPLOAD_FAILED: &str = "There was an error processing the uploaded images.";

/// Reference images plus the current generation outcome for one user session.
///
/// The presentation layer only reads: either through the accessors or by
/// subscribing to outcome changes.
pub struct SessionState {
    references: Vec<ReferenceImage>,
    encoder: ImageEncoder,
    outcome: watch::Sender<GenerationOutcome>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let (outcome, _) = watch::channel(GenerationOutcome::Idle);
        Self {
            references: Vec::new(),
            encoder: ImageEncoder::new(),
            outcome,
        }
    }

    pub fn references(&self) -> &[ReferenceImage] {
        &self.references
    }

    /// Copy of the reference list taken at dispatch time.
    pub fn snapshot(&self) -> Arc<[ReferenceImage]> {
        Arc::from(self.references.as_slice())
    }

    /// Encodes the whole batch, then appends it. Nothing is added if any file fails.
    pub async fn add_references(&mut self, batch: &[UploadedFile]) -> Result<usize> {
        let encoded = self.encoder.encode_batch(batch).await.map_err(|e| {
            log::error!("Error reading files: {}", e);
            ThumbnailError::Decode(UPLOAD_FAILED.into())
        })?;
        Ok(self.append_references(encoded))
    }

    pub fn append_references(&mut self, images: Vec<ReferenceImage>) -> usize {
        let added = images.len();
        self.references.extend(images);
        log::debug!(
            "Added {} reference image(s), {} held",
            added,
            self.references.len()
        );
        added
    }

    pub fn remove_reference(&mut self, index: usize) -> Result<ReferenceImage> {
        if index >= self.references.len() {
            return Err(ThumbnailError::Index {
                index,
                len: self.references.len(),
            });
        }
        Ok(self.references.remove(index))
    }

    pub fn clear_references(&mut self) {
        self.references.clear();
    }

    pub fn outcome(&self) -> GenerationOutcome {
        self.outcome.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationOutcome> {
        self.outcome.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.outcome.borrow().is_loading()
    }

    /// Whether the generate action should be enabled.
    pub fn can_generate(&self, title: &str) -> bool {
        !self.is_loading() && !title.trim().is_empty() && !self.references.is_empty()
    }

    pub(crate) fn publish(&self, outcome: GenerationOutcome) {
        self.outcome.send_replace(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(tag: &str) -> ReferenceImage {
        ReferenceImage::from_bytes(tag.as_bytes(), "image/png").unwrap()
    }

    fn session_with(tags: &[&str]) -> SessionState {
        let mut session = SessionState::new();
        session.append_references(tags.iter().map(|t| image(t)).collect());
        session
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut session = session_with(&["a", "b", "c"]);
        let removed = session.remove_reference(0).unwrap();
        assert_eq!(removed, image("a"));
        assert_eq!(session.references(), &[image("b"), image("c")]);
    }

    #[test]
    fn test_remove_out_of_range_leaves_list() {
        let mut session = session_with(&["a", "b", "c"]);
        let err = session.remove_reference(3).unwrap_err();
        assert!(matches!(err, ThumbnailError::Index { index: 3, len: 3 }));
        assert_eq!(session.references().len(), 3);
    }

    #[test]
    fn test_clear_is_unconditional() {
        let mut session = session_with(&["a", "b"]);
        session.clear_references();
        assert!(session.references().is_empty());
        session.clear_references();
        assert!(session.references().is_empty());
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let mut session = session_with(&["a"]);
        let batch = vec![
            UploadedFile::from_data_url("b.png", "data:image/png;base64,Yg=="),
            UploadedFile::from_data_url("c.png", "data:image/png;base64,Yw=="),
        ];
        assert_eq!(session.add_references(&batch).await.unwrap(), 2);
        assert_eq!(session.references(), &[image("a"), image("b"), image("c")]);
    }

    #[tokio::test]
    async fn test_failed_batch_adds_nothing() {
        let mut session = session_with(&["a"]);
        let batch = vec![
            UploadedFile::from_data_url("one.png", "data:image/png;base64,MQ=="),
            UploadedFile::from_bytes("two.txt", b"not an image".to_vec()),
            UploadedFile::from_data_url("three.png", "data:image/png;base64,Mw=="),
        ];
        let err = session.add_references(&batch).await.unwrap_err();
        assert_eq!(err.user_message(), UPLOAD_FAILED);
        assert_eq!(session.references(), &[image("a")]);
    }

    #[test]
    fn test_can_generate_guard() {
        let session = SessionState::new();
        assert!(!session.can_generate("Title"));
        let session = session_with(&["a"]);
        assert!(session.can_generate("Title"));
        assert!(!session.can_generate("  "));
        session.publish(GenerationOutcome::Loading);
        assert!(!session.can_generate("Title"));
    }

    #[test]
    fn test_subscribers_see_published_outcome() {
        let session = SessionState::new();
        let mut rx = session.subscribe();
        assert_eq!(*rx.borrow(), GenerationOutcome::Idle);
        session.publish(GenerationOutcome::Failure("nope".into()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), GenerationOutcome::Failure("nope".into()));
        assert_eq!(session.outcome(), GenerationOutcome::Failure("nope".into()));
    }
}
