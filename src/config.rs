use crate::error::{Result, ThumbnailError};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BEDROCK_MODEL: &str = "amazon.titan-image-generator-v1";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Bedrock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Bedrock => write!(f, "bedrock"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "bedrock" | "aws" => Ok(ProviderKind::Bedrock),
            other => Err(ThumbnailError::Config(format!(
                "Unknown provider '{}', expected 'gemini' or 'bedrock'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        GeminiConfig {
            api_key,
            model,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_BEDROCK_MODEL.to_string(),
            width: 1024,
            height: 1024,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();
        let model_id =
            env::var("BEDROCK_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_BEDROCK_MODEL.to_string());

        BedrockConfig {
            region,
            access_key,
            secret_key,
            model_id,
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    pub provider: ProviderKind,
    pub gemini: Option<GeminiConfig>,
    pub bedrock: Option<BedrockConfig>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let provider = match env::var("THUMBNAIL_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => ProviderKind::default(),
        };

        Ok(match provider {
            ProviderKind::Gemini => Self::new().with_gemini(GeminiConfig::from_env()),
            ProviderKind::Bedrock => Self::new().with_bedrock(BedrockConfig::from_env()),
        })
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = Some(config);
        self.provider = ProviderKind::Gemini;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = Some(config);
        self.provider = ProviderKind::Bedrock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" aws ".parse::<ProviderKind>().unwrap(), ProviderKind::Bedrock);
        assert!("dalle".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_builders_select_provider() {
        let config = GeneratorConfig::new().with_bedrock(
            BedrockConfig::new()
                .with_region("eu-west-1")
                .with_size(1280, 768),
        );
        assert_eq!(config.provider, ProviderKind::Bedrock);
        let bedrock = config.bedrock.unwrap();
        assert_eq!(bedrock.region.as_deref(), Some("eu-west-1"));
        assert_eq!(bedrock.model_id, DEFAULT_BEDROCK_MODEL);
        assert_eq!((bedrock.width, bedrock.height), (1280, 768));
    }

    #[test]
    fn test_gemini_defaults() {
        let gemini = GeminiConfig::new().with_api_key("k");
        assert_eq!(gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(gemini.api_key.as_deref(), Some("k"));
    }
}
