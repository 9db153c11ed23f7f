/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog, the gateway, the library and the UI layer.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::ai::Analysis;
use crate::encode::ImageData;

/// Title given to uploads the gateway could not describe
pub const PLACEHOLDER_TITLE: &str = "New Photo";
/// Description given to uploads the gateway could not describe
pub const PLACEHOLDER_DESCRIPTION: &str = "Uploaded from device";
/// Category given to uploads the gateway could not describe
pub const PLACEHOLDER_CATEGORY: &str = "Other";
/// Tag given to uploads the gateway could not describe
pub const PLACEHOLDER_TAG: &str = "uploaded";

/// Opaque, unique photo identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(String);

impl PhotoId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        PhotoId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PhotoId {
    fn from(id: &str) -> Self {
        PhotoId(id.to_string())
    }
}

impl From<String> for PhotoId {
    fn from(id: String) -> Self {
        PhotoId(id)
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a single photo in the gallery
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    /// Assigned at creation, never changes
    pub id: PhotoId,
    /// Inline image payload; only a successful AI edit replaces it
    pub image: ImageData,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    /// Set once at creation, never changes
    pub created_at: DateTime<Utc>,
    /// True once an AI edit has replaced the image
    pub ai_generated: bool,
}

impl PhotoRecord {
    /// Build a record from a successful analysis
    pub fn from_analysis(
        id: PhotoId,
        image: ImageData,
        analysis: Analysis,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            image,
            title: analysis.title,
            description: analysis.description,
            tags: analysis.tags,
            category: analysis.category,
            created_at,
            ai_generated: false,
        }
    }

    /// Build a record with placeholder text, for uploads without an analysis
    pub fn placeholder(id: PhotoId, image: ImageData, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            image,
            title: PLACEHOLDER_TITLE.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            tags: vec![PLACEHOLDER_TAG.to_string()],
            category: PLACEHOLDER_CATEGORY.to_string(),
            created_at,
            ai_generated: false,
        }
    }

    /// Copy of this record after a successful AI edit
    pub fn with_ai_edit(&self, image: ImageData, instruction: &str) -> Self {
        Self {
            image,
            description: format!("{} (AI Edited: {})", self.description, instruction),
            ai_generated: true,
            ..self.clone()
        }
    }

    /// Case-insensitive substring match against title, description,
    /// category and tags. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    fn sample() -> PhotoRecord {
        PhotoRecord {
            id: PhotoId::from("a"),
            image: encode(vec![1, 2, 3], "image/jpeg"),
            title: "Morning Mist".to_string(),
            description: "A serene mountain landscape.".to_string(),
            tags: vec!["Nature".to_string(), "fog".to_string()],
            category: "Landscape".to_string(),
            created_at: Utc::now(),
            ai_generated: false,
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(PhotoId::generate(), PhotoId::generate());
    }

    #[test]
    fn test_placeholder_fields() {
        let record = PhotoRecord::placeholder(
            PhotoId::from("p"),
            encode(vec![], "image/png"),
            Utc::now(),
        );
        assert_eq!(record.title, "New Photo");
        assert_eq!(record.description, "Uploaded from device");
        assert_eq!(record.category, "Other");
        assert_eq!(record.tags, vec!["uploaded".to_string()]);
        assert!(!record.ai_generated);
    }

    #[test]
    fn test_ai_edit_keeps_identity() {
        let original = sample();
        let edited = original.with_ai_edit(encode(vec![9], "image/png"), "add a sunset");

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.title, original.title);
        assert!(edited.ai_generated);
        assert_eq!(edited.image.bytes(), &[9]);
        assert_eq!(
            edited.description,
            "A serene mountain landscape. (AI Edited: add a sunset)"
        );
    }

    #[test]
    fn test_matches_every_field() {
        let record = sample();
        assert!(record.matches("mist"));
        assert!(record.matches("serene"));
        assert!(record.matches("landscape"));
        assert!(record.matches("nature"));
        assert!(record.matches("fo"));
        assert!(!record.matches("city"));
    }
}
