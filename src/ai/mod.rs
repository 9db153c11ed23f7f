/// AI gateway
///
/// The gallery talks to a remote generative model for two things:
/// - describing a freshly uploaded image (`analyze`)
/// - rewriting an image from a text instruction (`edit`)
///
/// Architecture:
/// - `mod.rs` - the `Gateway` trait and its result types
/// - `gemini.rs` - Gemini implementation over HTTPS
/// - `response.rs` - validation of the model's loosely-shaped output

pub mod gemini;
pub mod response;

use async_trait::async_trait;

use crate::encode::ImageData;
use crate::error::GatewayError;

pub use gemini::GeminiGateway;

/// Descriptive fields produced by a successful analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub title: String,
    pub description: String,
    /// Usually five entries, but any count is accepted
    pub tags: Vec<String>,
    /// Open set: Nature, Architecture, People, Tech, Other, ...
    pub category: String,
}

/// Outcome of an analysis call that reached the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Valid(Analysis),
    /// The model answered, but not with the fields we asked for
    Malformed,
}

/// Remote model used for analysis and magic edits
///
/// Calls may take arbitrarily long and are never retried.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Describe an image
    async fn analyze(&self, image: &ImageData) -> Result<AnalysisResult, GatewayError>;

    /// Rewrite an image from an instruction. `Ok(None)` means the model
    /// answered without an image part.
    async fn edit(
        &self,
        image: &ImageData,
        instruction: &str,
    ) -> Result<Option<ImageData>, GatewayError>;
}
