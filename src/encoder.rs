use crate::{
    error::{Result, ThumbnailError},
    models::{ReferenceImage, ACCEPTED_MEDIA_TYPES},
};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};

/// A file handed over by the upload boundary, before it has been read.
#[derive(Debug, Clone)]
pub enum UploadedFile {
    Path(PathBuf),
    Bytes {
        name: String,
        bytes: Vec<u8>,
        declared_type: Option<String>,
    },
    /// `data:<media type>;base64,<payload>`, the shape a browser file reader produces.
    DataUrl { name: String, url: String },
}

impl UploadedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        UploadedFile::Path(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile::Bytes {
            name: name.into(),
            bytes,
            declared_type: None,
        }
    }

    pub fn from_data_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        UploadedFile::DataUrl {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn with_declared_type(self, media_type: impl Into<String>) -> Self {
        match self {
            UploadedFile::Bytes { name, bytes, .. } => UploadedFile::Bytes {
                name,
                bytes,
                declared_type: Some(media_type.into()),
            },
            other => other,
        }
    }

    pub fn name(&self) -> String {
        match self {
            UploadedFile::Path(path) => path.display().to_string(),
            UploadedFile::Bytes { name, .. } | UploadedFile::DataUrl { name, .. } => name.clone(),
        }
    }
}

/// Turns uploaded files into [`ReferenceImage`]s. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    pub async fn encode(&self, file: &UploadedFile) -> Result<ReferenceImage> {
        match file {
            UploadedFile::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    ThumbnailError::Decode(format!("could not read {}: {}", path.display(), e))
                })?;
                let media_type = resolve_media_type(&bytes, None, Some(path.as_path()))
                    .ok_or_else(|| unknown_media_type(&file.name()))?;
                ReferenceImage::from_bytes(&bytes, media_type)
            }
            UploadedFile::Bytes {
                name,
                bytes,
                declared_type,
            } => {
                let media_type =
                    resolve_media_type(bytes, declared_type.as_deref(), Some(Path::new(name)))
                        .ok_or_else(|| unknown_media_type(name))?;
                ReferenceImage::from_bytes(bytes, media_type)
            }
            UploadedFile::DataUrl { name, url } => {
                let (media_type, payload) =
                    split_data_url(url).ok_or_else(|| unknown_media_type(name))?;
                if !media_type.starts_with("image/") {
                    return Err(unknown_media_type(name));
                }
                ReferenceImage::from_encoded(payload, media_type)
            }
        }
    }

    /// Encodes every file or none: the first failure fails the whole batch.
    pub async fn encode_batch(&self, files: &[UploadedFile]) -> Result<Vec<ReferenceImage>> {
        try_join_all(files.iter().map(|file| async move {
            self.encode(file).await.map_err(|e| {
                log::error!("Error reading file {}: {}", file.name(), e);
                e
            })
        }))
        .await
    }
}

fn unknown_media_type(name: &str) -> ThumbnailError {
    ThumbnailError::Decode(format!("Could not parse mime type for file: {}", name))
}

/// Content sniffing wins; the declared type and then the extension are fallbacks.
fn resolve_media_type(bytes: &[u8], declared: Option<&str>, path: Option<&Path>) -> Option<String> {
    let resolved = match infer::get(bytes) {
        Some(kind) => {
            let sniffed = kind.mime_type();
            sniffed.starts_with("image/").then(|| sniffed.to_string())
        }
        None => declared
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| value.starts_with("image/"))
            .or_else(|| path.and_then(media_type_for_path).map(str::to_string)),
    };

    if let Some(media_type) = &resolved {
        if !ACCEPTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            log::warn!("Accepting {} upload outside the advertised types", media_type);
        }
    }
    resolved
}

fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn split_data_url(url: &str) -> Option<(String, &str)> {
    let (meta, payload) = url.split_once(',')?;
    let header = meta.strip_prefix("data:")?;
    let (media_type, _) = header.split_once(';')?;
    let (_, encoding) = header.rsplit_once(';')?;
    if media_type.is_empty() || !encoding.eq_ignore_ascii_case("base64") {
        return None;
    }
    Some((media_type.to_ascii_lowercase(), payload))
}
