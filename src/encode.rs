/// Inline image encoding
///
/// Uploaded files are kept in memory as self-contained image data (mime type
/// plus raw bytes) so they can be rendered, sent to the gateway as base64,
/// and written to the library without touching the original file again.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::EncodeError;

/// Mime type used when neither the content nor the extension identifies the image
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A self-contained image: mime type plus payload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    mime_type: String,
    bytes: Vec<u8>,
}

/// Wrap raw file bytes with their mime type. Never fails.
pub fn encode(bytes: Vec<u8>, mime_type: &str) -> ImageData {
    ImageData {
        mime_type: mime_type.to_string(),
        bytes,
    }
}

impl ImageData {
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 payload without the `data:` header, as the gateway expects it
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Render as `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Decode a base64 payload with a known mime type
    pub fn from_base64(mime_type: &str, payload: &str) -> Result<Self, EncodeError> {
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(encode(bytes, mime_type))
    }

    /// Parse a `data:<mime>;base64,<payload>` string
    pub fn from_data_uri(uri: &str) -> Result<Self, EncodeError> {
        let invalid = || EncodeError::InvalidDataUri(uri.chars().take(32).collect());

        let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
        let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(invalid)?;
        if mime_type.is_empty() {
            return Err(invalid());
        }

        Self::from_base64(mime_type, payload)
    }
}

// Payloads are large; print only their size
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Read a user-selected file and encode it
///
/// A read failure ends the upload attempt; no record is created for it.
pub async fn read_image_file(path: PathBuf) -> Result<ImageData, EncodeError> {
    let bytes = tokio::fs::read(&path).await.map_err(|source| EncodeError::Read {
        path: path.clone(),
        source: Arc::new(source),
    })?;

    let mime_type = sniff_mime_type(&bytes, &path);
    tracing::debug!("📥 Read {} ({} bytes, {})", path.display(), bytes.len(), mime_type);

    Ok(encode(bytes, mime_type))
}

/// Work out the mime type from the content first, then the file extension
fn sniff_mime_type(bytes: &[u8], path: &Path) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}
