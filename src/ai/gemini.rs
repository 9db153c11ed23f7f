/// Gemini implementation of the AI gateway
///
/// Both operations use the `generateContent` endpoint with the image sent
/// inline as base64 next to a text part.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::response::{parse_analysis, parse_edited_image};
use super::{AnalysisResult, Gateway};
use crate::config::GeminiConfig;
use crate::encode::ImageData;
use crate::error::GatewayError;

/// Instruction sent alongside every image to be described
const ANALYSIS_PROMPT: &str = "Analyze this image and provide a structured JSON response. \
Include a short descriptive title, a poetic description, a list of 5 tags, \
and a broad category (e.g., Nature, People, Architecture, Tech).";

/// Gateway backed by the Gemini REST API
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key_env: String,
    api_key: Option<String>,
    analysis_model: String,
    edit_model: String,
}

impl GeminiGateway {
    /// Create a gateway from configuration.
    ///
    /// The API key is read from the configured environment variable. A
    /// missing key is not an error here: every call will fail instead, so
    /// uploads still land in the gallery with placeholder text.
    pub fn new(config: &GeminiConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "⚠️  ${} is not set; AI analysis and edits are unavailable",
                config.api_key_env
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
            api_key,
            analysis_model: config.analysis_model.clone(),
            edit_model: config.edit_model.clone(),
        })
    }

    /// POST a payload to `models/{model}:generateContent`
    async fn generate(&self, model: &str, payload: &Value) -> Result<Value, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::MissingApiKey(self.api_key_env.clone()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the API's own message over the raw body
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(GatewayError::Service {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|err| GatewayError::InvalidResponse(format!("response is not JSON: {}", err)))
    }
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("base_url", &self.base_url)
            .field("api_key_env", &self.api_key_env)
            .field("analysis_model", &self.analysis_model)
            .field("edit_model", &self.edit_model)
            .finish()
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn analyze(&self, image: &ImageData) -> Result<AnalysisResult, GatewayError> {
        tracing::info!("🤖 Analyzing image ({} bytes)", image.bytes().len());
        let response = self
            .generate(&self.analysis_model, &analysis_request(image))
            .await?;
        parse_analysis(&response)
    }

    async fn edit(
        &self,
        image: &ImageData,
        instruction: &str,
    ) -> Result<Option<ImageData>, GatewayError> {
        tracing::info!("🪄 Editing image: {}", instruction);
        let response = self
            .generate(&self.edit_model, &edit_request(image, instruction))
            .await?;
        parse_edited_image(&response)
    }
}

fn inline_image_part(image: &ImageData) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type(),
            "data": image.to_base64(),
        }
    })
}

/// Request body asking for a JSON description of the image
fn analysis_request(image: &ImageData) -> Value {
    json!({
        "contents": [{
            "parts": [inline_image_part(image), { "text": ANALYSIS_PROMPT }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "category": { "type": "STRING" }
                },
                "required": ["title", "description", "tags", "category"]
            }
        }
    })
}

/// Request body carrying the image and a free-text instruction
fn edit_request(image: &ImageData, instruction: &str) -> Value {
    json!({
        "contents": [{
            "parts": [inline_image_part(image), { "text": instruction }]
        }]
    })
}
