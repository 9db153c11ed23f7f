/// Application configuration
///
/// Read from `config.toml` in the user's config directory:
/// - Linux: ~/.config/photo-gallery/config.toml
/// - macOS: ~/Library/Application Support/photo-gallery/config.toml
/// - Windows: %APPDATA%\photo-gallery\config.toml
///
/// `PHOTO_GALLERY_CONFIG` points at a different file. A missing file means
/// all defaults.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "PHOTO_GALLERY_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub gemini: GeminiConfig,
    pub library: LibraryConfig,
}

/// Settings for the Gemini gateway
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub analysis_model: String,
    pub edit_model: String,
    /// No timeout when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            analysis_model: "gemini-3-flash-preview".to_string(),
            edit_model: "gemini-2.5-flash-image".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Settings for the on-disk library
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Keep the gallery between runs. Off by default: the gallery lives in memory.
    pub persist: bool,
    /// Defaults to `<data_dir>/photo-gallery/gallery.db`
    pub path: Option<PathBuf>,
}

impl LibraryConfig {
    /// Where the library database lives
    pub fn db_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            path.push("photo-gallery");
            path.push("gallery.db");
            path
        })
    }
}

impl GalleryConfig {
    /// Load from `PHOTO_GALLERY_CONFIG` or the default location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let config = Self::from_toml(&text)?;
        tracing::info!("⚙️  Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("photo-gallery").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = GalleryConfig::from_toml("").unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert!(!config.library.persist);
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = GalleryConfig::from_toml(
            r#"
            [gemini]
            edit_model = "custom-image-model"
            request_timeout_secs = 90

            [library]
            persist = true
            path = "/tmp/gallery.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.gemini.edit_model, "custom-image-model");
        assert_eq!(config.gemini.analysis_model, "gemini-3-flash-preview");
        assert_eq!(config.gemini.request_timeout_secs, Some(90));
        assert!(config.library.persist);
        assert_eq!(config.library.db_path(), PathBuf::from("/tmp/gallery.db"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            GalleryConfig::from_toml("[library]\npersist = \"maybe\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[library]\npersist = true").unwrap();

        let config = GalleryConfig::from_file(file.path().to_path_buf()).unwrap();
        assert!(config.library.persist);
    }

    #[test]
    fn test_default_db_path_ends_with_app_dir() {
        let path = LibraryConfig::default().db_path();
        assert!(path.ends_with("photo-gallery/gallery.db"));
    }
}
