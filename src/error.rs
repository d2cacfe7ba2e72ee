//! Error types for the placeholder-pages library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the placeholder-pages library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Font error
    #[error("Font error: {0}")]
    Font(String),

    /// Placeholder template not found
    #[error("Template image not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Image folder could not be resolved or prepared
    #[error("Cannot prepare image folder {}: {}", .0.display(), .1)]
    FolderPreparation(PathBuf, String),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Metadata type name not present in the schema
    #[error("Unknown metadata type: {0}")]
    UnknownMetadataType(String),

    /// Structure type name not present in the schema
    #[error("Unknown structure type: {0}")]
    UnknownStructType(String),

    /// Metadata type not allowed on the structure type it was added to
    #[error("Metadata type {metadata} is not allowed on {structure}")]
    MetadataNotAllowed { metadata: String, structure: String },

    /// Metadata document could not be read or written
    #[error("Metadata document error: {0}")]
    Document(#[from] serde_json::Error),

    /// Page-count input rejected by validation
    #[error("{0}")]
    Validation(#[from] crate::validate::ValidationError),

    /// General error
    #[error("{0}")]
    General(String),
}
