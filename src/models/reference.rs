use crate::error::{Result, ThumbnailError};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

/// Media types the upload boundary accepts.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// A user-supplied photo, base64 encoded, used as visual context for generation.
///
/// Immutable once created; build one through [`ReferenceImage::from_bytes`] or
/// [`ReferenceImage::from_encoded`], both of which enforce that the media type is
/// MIME shaped and the payload is valid base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceImage {
    #[serde(rename = "data")]
    payload: String,
    #[serde(rename = "mimeType")]
    media_type: String,
}

impl ReferenceImage {
    pub fn from_bytes(bytes: &[u8], media_type: impl Into<String>) -> Result<Self> {
        let media_type = checked_media_type(media_type.into())?;
        if bytes.is_empty() {
            return Err(ThumbnailError::Decode("image content is empty".into()));
        }
        Ok(Self {
            payload: STANDARD.encode(bytes),
            media_type,
        })
    }

    pub fn from_encoded(payload: impl Into<String>, media_type: impl Into<String>) -> Result<Self> {
        let media_type = checked_media_type(media_type.into())?;
        let payload = payload.into();
        let decoded = STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| ThumbnailError::Decode(format!("invalid base64 payload: {}", e)))?;
        if decoded.is_empty() {
            return Err(ThumbnailError::Decode("image content is empty".into()));
        }
        Ok(Self {
            payload,
            media_type,
        })
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Preview form used by the uploader grid.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.payload)
    }

    pub fn encoded_len(&self) -> usize {
        self.payload.len()
    }
}

fn checked_media_type(media_type: String) -> Result<String> {
    let trimmed = media_type.trim().to_ascii_lowercase();
    let shaped = match trimmed.split_once('/') {
        Some((kind, sub)) => !kind.is_empty() && !sub.is_empty() && !sub.contains('/'),
        None => false,
    };
    if !shaped {
        return Err(ThumbnailError::Decode(format!(
            "'{}' is not a valid media type",
            media_type
        )));
    }
    Ok(trimmed)
}
