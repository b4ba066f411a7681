use crate::error::{Result, ThumbnailError};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Every generated thumbnail comes back as PNG.
pub const GENERATED_MEDIA_TYPE: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub image_data: String, // Base64 encoded
}

impl GeneratedImage {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: image_data.into(),
        }
    }

    pub fn media_type(&self) -> &'static str {
        GENERATED_MEDIA_TYPE
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", GENERATED_MEDIA_TYPE, self.image_data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.image_data.as_bytes())
            .map_err(|e| ThumbnailError::Decode(format!("generated image is not valid base64: {}", e)))
    }
}

/// Current result state of a generation run. Only one value per session, never a history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum GenerationOutcome {
    #[default]
    Idle,
    Loading,
    Success(Vec<GeneratedImage>),
    Failure(String),
}

impl GenerationOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, GenerationOutcome::Loading)
    }

    pub fn images(&self) -> &[GeneratedImage] {
        match self {
            GenerationOutcome::Success(images) => images,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Downloadable artifacts for a successful run, named after the video title.
    pub fn artifacts(&self, title: &str) -> Vec<DownloadArtifact> {
        let images = self.images();
        images
            .iter()
            .enumerate()
            .map(|(index, image)| DownloadArtifact {
                file_name: suggested_filename(title, index, images.len()),
                image: image.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub image: GeneratedImage,
}

/// Lower-cased title with every non-alphanumeric character replaced by `_`.
/// The 1-based index is only appended when more than one image was produced.
pub fn suggested_filename(title: &str, index: usize, total: usize) -> String {
    let base: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let base = if base.is_empty() {
        "thumbnail".to_string()
    } else {
        base
    };

    if total > 1 {
        format!("{}_{}.png", base, index + 1)
    } else {
        format!("{}.png", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_image_filename() {
        assert_eq!(suggested_filename("My Trip", 0, 1), "my_trip.png");
    }

    #[test]
    fn test_multiple_image_filenames_are_indexed() {
        assert_eq!(suggested_filename("  Top 10 Hacks!  ", 0, 3), "top_10_hacks__1.png");
        assert_eq!(suggested_filename("Top 10 Hacks!", 2, 3), "top_10_hacks__3.png");
    }

    #[test]
    fn test_blank_title_falls_back() {
        assert_eq!(suggested_filename("   ", 0, 1), "thumbnail.png");
    }

    #[test]
    fn test_artifacts_follow_image_order() {
        let outcome = GenerationOutcome::Success(vec![
            GeneratedImage::new("AAAA"),
            GeneratedImage::new("BBBB"),
        ]);
        let artifacts = outcome.artifacts("Cats");
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].file_name, "cats_1.png");
        assert_eq!(artifacts[0].image.image_data, "AAAA");
        assert_eq!(artifacts[1].file_name, "cats_2.png");
    }

    #[test]
    fn test_non_success_has_no_artifacts() {
        assert!(GenerationOutcome::Loading.artifacts("x").is_empty());
        let failed = GenerationOutcome::Failure("boom".into());
        assert!(failed.artifacts("x").is_empty());
        assert_eq!(failed.error(), Some("boom"));
    }

    #[test]
    fn test_generated_image_decodes() {
        let image = GeneratedImage::new("aGVsbG8=");
        assert_eq!(image.decode().unwrap(), b"hello");
        assert_eq!(image.data_url(), "data:image/png;base64,aGVsbG8=");
        assert!(GeneratedImage::new("%%").decode().is_err());
    }
}
