use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Rejected before any request leaves the process.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    Remote(String),
    #[error("Reference index {index} is out of bounds for {len} image(s)")]
    Index { index: usize, len: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ThumbnailError {
    /// Message suitable for the result area of the UI.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ThumbnailError::Validation(_))
    }
}

impl From<serde_json::Error> for ThumbnailError {
    fn from(err: serde_json::Error) -> Self {
        ThumbnailError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
