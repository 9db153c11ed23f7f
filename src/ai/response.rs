/// Validation of Gemini `generateContent` responses
///
/// Nothing in the response is trusted: every field is checked here before
/// it reaches the catalog.

use serde::Deserialize;
use serde_json::Value;

use super::{Analysis, AnalysisResult};
use crate::encode::ImageData;
use crate::error::GatewayError;

/// Mime type assumed when an image part does not name one
const DEFAULT_EDIT_MIME_TYPE: &str = "image/png";

/// Raw analysis object as the model writes it
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    title: String,
    description: String,
    tags: Vec<Value>,
    category: String,
}

/// Surface an `{"error": {...}}` body as a service error
fn check_error(response: &Value) -> Result<(), GatewayError> {
    match response.get("error") {
        Some(error) => Err(GatewayError::Service {
            status: error["code"]
                .as_u64()
                .and_then(|code| u16::try_from(code).ok())
                .unwrap_or(0),
            message: error["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string(),
        }),
        None => Ok(()),
    }
}

/// Parts of the first candidate, if any
fn candidate_parts(response: &Value) -> &[Value] {
    response["candidates"][0]["content"]["parts"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Concatenated text of the first candidate
fn candidate_text(response: &Value) -> Option<String> {
    let text: String = candidate_parts(response)
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

/// Turn an analysis response into a tagged result
///
/// Non-string tags are dropped; anything else missing or mistyped makes
/// the whole result `Malformed`.
pub fn parse_analysis(response: &Value) -> Result<AnalysisResult, GatewayError> {
    check_error(response)?;

    let Some(text) = candidate_text(response) else {
        return Ok(AnalysisResult::Malformed);
    };

    let raw: RawAnalysis = match serde_json::from_str(strip_code_fence(&text)) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!("Analysis response did not match the schema: {}", err);
            return Ok(AnalysisResult::Malformed);
        }
    };

    let tags = raw
        .tags
        .into_iter()
        .filter_map(|tag| tag.as_str().map(str::to_string))
        .collect();

    Ok(AnalysisResult::Valid(Analysis {
        title: raw.title,
        description: raw.description,
        tags,
        category: raw.category,
    }))
}

/// Pull the replacement image out of an edit response
///
/// The first part carrying `inlineData` wins. No such part is `Ok(None)`;
/// an image part with an undecodable payload is an error.
pub fn parse_edited_image(response: &Value) -> Result<Option<ImageData>, GatewayError> {
    check_error(response)?;

    let Some(inline) = candidate_parts(response)
        .iter()
        .map(|part| &part["inlineData"])
        .find(|inline| inline.is_object())
    else {
        return Ok(None);
    };

    let payload = inline["data"]
        .as_str()
        .ok_or_else(|| GatewayError::InvalidResponse("image part has no data".to_string()))?;
    let mime_type = inline["mimeType"].as_str().unwrap_or(DEFAULT_EDIT_MIME_TYPE);

    ImageData::from_base64(mime_type, payload)
        .map(Some)
        .map_err(|err| GatewayError::InvalidResponse(err.to_string()))
}

/// Models sometimes wrap JSON in a markdown fence even when asked not to
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
