use crate::{
    config::{BedrockConfig, DEFAULT_REGION},
    error::{Result, ThumbnailError},
    models::{GeneratedImage, GenerationRequest},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use serde::Deserialize;
use serde_json::{json, Value};

use super::GenerationClient;

/// Titan rejects prompts longer than this.
const TITAN_MAX_PROMPT_CHARS: usize = 512;
const TITAN_BASE_SEED: u64 = 42;
const TITAN_MODEL_PREFIX: &str = "amazon.titan-image-generator";

#[derive(Clone)]
pub struct BedrockImageClient {
    client: Client,
    config: BedrockConfig,
}

#[derive(Deserialize)]
struct TitanImageResponse {
    #[serde(default)]
    images: Vec<String>,
    error: Option<String>,
}

impl BedrockImageClient {
    pub async fn new(config: BedrockConfig) -> Result<Self> {
        if !config.model_id.starts_with(TITAN_MODEL_PREFIX) {
            return Err(ThumbnailError::Config(format!(
                "Unsupported image model: {}",
                config.model_id
            )));
        }

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&config.access_key, &config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "thumbgen",
                ))
                .region(aws_sdk_bedrockruntime::config::Region::new(region))
                .load()
                .await
        } else {
            aws_config::from_env()
                .region(aws_sdk_bedrockruntime::config::Region::new(region))
                .load()
                .await
        };

        Ok(Self {
            client: Client::new(&aws_config),
            config,
        })
    }

    fn build_payload(&self, request: &GenerationRequest) -> Value {
        let images: Vec<&str> = request
            .references
            .iter()
            .map(|image| image.payload())
            .collect();

        // Titan cannot see the variation clause once the prompt is clipped,
        // so each variation also gets its own seed.
        json!({
            "taskType": "IMAGE_VARIATION",
            "imageVariationParams": {
                "text": clip_prompt(&request.prompt, TITAN_MAX_PROMPT_CHARS),
                "images": images,
                "similarityStrength": 0.7
            },
            "imageGenerationConfig": {
                "numberOfImages": 1,
                "quality": "standard",
                "cfgScale": 8.0,
                "width": self.config.width,
                "height": self.config.height,
                "seed": TITAN_BASE_SEED + request.variation_index as u64
            }
        })
    }
}

#[async_trait]
impl GenerationClient for BedrockImageClient {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let payload = self.build_payload(request);
        let request_json = serde_json::to_string(&payload)?;

        log::info!(
            "Generating variation {} with model: {}",
            request.variation_index + 1,
            self.config.model_id
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&self.config.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                if let Some(service_error) = e.as_service_error() {
                    ThumbnailError::Remote(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    ThumbnailError::Remote(format!("AWS SDK error: {}", e))
                }
            })?;

        parse_titan_response(&response.body.into_inner())
    }
}

fn parse_titan_response(bytes: &[u8]) -> Result<GeneratedImage> {
    let titan: TitanImageResponse = serde_json::from_slice(bytes)
        .map_err(|e| ThumbnailError::Remote(format!("Failed to parse Titan response: {}", e)))?;

    if let Some(error) = titan.error.filter(|error| !error.is_empty()) {
        return Err(ThumbnailError::Remote(error));
    }

    titan
        .images
        .into_iter()
        .next()
        .map(GeneratedImage::new)
        .ok_or_else(|| ThumbnailError::Remote("No images generated".into()))
}

fn clip_prompt(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() <= max_chars {
        return prompt.to_string();
    }
    let clipped: String = prompt.chars().take(max_chars).collect();
    match clipped.rfind(char::is_whitespace) {
        Some(cut) => clipped[..cut].to_string(),
        None => clipped,
    }
}
