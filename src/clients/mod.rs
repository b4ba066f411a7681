pub mod bedrock;
pub mod gemini;

use crate::{
    config::{GeneratorConfig, ProviderKind},
    error::{Result, ThumbnailError},
    models::{GeneratedImage, GenerationRequest},
};
use async_trait::async_trait;
use std::sync::Arc;

pub use bedrock::BedrockImageClient;
pub use gemini::GeminiImageClient;

/// Boundary to a remote image model: one prompt plus references in, one PNG out.
///
/// Failures are opaque to callers; every cause surfaces as [`ThumbnailError::Remote`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;
}

pub async fn build_client(config: &GeneratorConfig) -> Result<Arc<dyn GenerationClient>> {
    let client: Arc<dyn GenerationClient> = match config.provider {
        ProviderKind::Gemini => {
            let gemini = config.gemini.clone().ok_or_else(|| {
                ThumbnailError::Config("Gemini config required".into())
            })?;
            Arc::new(GeminiImageClient::new(gemini)?)
        }
        ProviderKind::Bedrock => {
            let bedrock = config.bedrock.clone().ok_or_else(|| {
                ThumbnailError::Config("Bedrock config required".into())
            })?;
            Arc::new(BedrockImageClient::new(bedrock).await?)
        }
    };

    log::info!("Using {} image generation client", client.name());
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    #[tokio::test]
    async fn test_missing_section_is_config_error() {
        let mut config = GeneratorConfig::new();
        config.provider = ProviderKind::Bedrock;
        let err = build_client(&config).await.err().unwrap();
        assert!(matches!(err, ThumbnailError::Config(_)));
    }

    #[tokio::test]
    async fn test_builds_gemini_client() {
        let config = GeneratorConfig::new().with_gemini(GeminiConfig::new().with_api_key("key"));
        let client = build_client(&config).await.unwrap();
        assert_eq!(client.name(), "gemini");
    }
}
