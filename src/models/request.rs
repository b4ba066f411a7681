use super::ReferenceImage;
use std::sync::Arc;

/// One variation's worth of work for a [`GenerationClient`](crate::clients::GenerationClient).
///
/// The reference list is shared by every variation of a run; the first entry is the
/// primary subject.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub references: Arc<[ReferenceImage]>,
    pub variation_index: usize,
}

impl GenerationRequest {
    pub fn new(prompt: String, references: Arc<[ReferenceImage]>, variation_index: usize) -> Self {
        Self {
            prompt,
            references,
            variation_index,
        }
    }

    pub fn primary_reference(&self) -> Option<&ReferenceImage> {
        self.references.first()
    }
}
