use crate::{
    config::GeminiConfig,
    error::{Result, ThumbnailError},
    models::{GeneratedImage, GenerationRequest, ReferenceImage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GenerationClient;

#[derive(Clone)]
pub struct GeminiImageClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| ThumbnailError::Config("GEMINI_API_KEY is not set".into()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiImageClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let payload = GenerateContentRequest::from_request(request);

        log::info!(
            "Generating variation {} with model: {}",
            request.variation_index + 1,
            self.model
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ThumbnailError::Remote(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ThumbnailError::Remote(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ThumbnailError::Remote(format!("Failed to parse Gemini response: {}", e)))?;

        body.first_image()
            .ok_or_else(|| ThumbnailError::Remote("No image data in Gemini response".into()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        let mut parts: Vec<Part<'a>> = request
            .references
            .iter()
            .map(|image| Part::InlineData { inline_data: image })
            .collect();
        parts.push(Part::Text {
            text: &request.prompt,
        });

        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: &'a ReferenceImage,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

impl GenerateContentResponse {
    fn first_image(self) -> Option<GeneratedImage> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.inline_data)
            .find(|inline| !inline.data.is_empty())
            .map(|inline| GeneratedImage::new(inline.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_request_puts_references_before_prompt() {
        let references: Arc<[ReferenceImage]> = vec![
            ReferenceImage::from_bytes(b"one", "image/png").unwrap(),
            ReferenceImage::from_bytes(b"two", "image/jpeg").unwrap(),
        ]
        .into();
        let request = GenerationRequest::new("make it pop".into(), references, 0);
        let value = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "dHdv");
        assert_eq!(parts[2]["text"], "make it pop");
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }

    #[test]
    fn test_response_extracts_first_inline_image() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your thumbnail" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0K" } }
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.first_image().unwrap().image_data, "iVBORw0K");
    }

    #[test]
    fn test_text_only_response_has_no_image() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "refused" }] } }]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert!(response.first_image().is_none());

        let empty: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.first_image().is_none());
    }

    #[test]
    fn test_requires_api_key() {
        assert!(GeminiImageClient::new(GeminiConfig::new()).is_err());
        let client = GeminiImageClient::new(
            GeminiConfig::new()
                .with_api_key("k")
                .with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
    }
}
