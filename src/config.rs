//! Step-scoped configuration
//!
//! Read once when a step is initialized and immutable afterwards. A missing
//! file is not an error; every field has a working default.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// File name looked up inside the process directory when no explicit
/// configuration path is given.
pub const CONFIG_FILE_NAME: &str = "placeholder.toml";

/// Output encoding for the generated page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Tif,
}

impl ImageFormat {
    /// File extension used for generated page files
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Tif => "tif",
        }
    }
}

/// Configuration for one placeholder-creation step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    /// Logical names of the image folders to populate
    pub folders: Vec<String>,
    /// Remove existing folder contents before stamping
    pub delete_existing: bool,
    /// Path to the placeholder template image
    pub template: Option<std::path::PathBuf>,
    /// Output format of the generated images
    pub image_format: ImageFormat,
    /// TTF used for the page-number stamp; system fallbacks when unset
    pub font: Option<std::path::PathBuf>,
    /// Structure type created when the document has no physical root yet
    pub physical_root_type: String,
    /// Structure type used when no metadata document exists at all
    pub logical_root_type: String,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            folders: vec!["master".to_string()],
            delete_existing: false,
            template: None,
            image_format: ImageFormat::Png,
            font: None,
            physical_root_type: "BoundBook".to_string(),
            logical_root_type: "Monograph".to_string(),
        }
    }
}

impl StepConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load the configuration next to a process directory, falling back to
    /// defaults when the file does not exist.
    pub fn load_for_process(process_dir: &Path) -> Result<Self> {
        let path = process_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StepConfig::default();
        assert_eq!(config.folders, vec!["master".to_string()]);
        assert!(!config.delete_existing);
        assert_eq!(config.image_format, ImageFormat::Png);
        assert_eq!(config.physical_root_type, "BoundBook");
        assert_eq!(config.logical_root_type, "Monograph");
    }

    #[test]
    fn test_parse_full() {
        let config = StepConfig::from_toml(
            r#"
            folders = ["master", "media"]
            delete_existing = true
            template = "/opt/digitization/placeholder.png"
            image_format = "tif"
            physical_root_type = "Binding"
            "#,
        )
        .unwrap();

        assert_eq!(config.folders.len(), 2);
        assert!(config.delete_existing);
        assert_eq!(config.image_format, ImageFormat::Tif);
        assert_eq!(config.image_format.extension(), "tif");
        assert_eq!(config.physical_root_type, "Binding");
        // Unset fields keep their defaults
        assert_eq!(config.logical_root_type, "Monograph");
    }

    #[test]
    fn test_parse_invalid_field() {
        assert!(StepConfig::from_toml("no_such_option = 1").is_err());
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(StepConfig::from_toml(r#"image_format = "bmp""#).is_err());
    }
}
