//! Structural-metadata document handling

pub mod document;
pub mod schema;
pub mod update;

// Re-export commonly used items
pub use document::{ContentFile, DocStruct, Document, Metadata, StructLink};
pub use schema::{DocStructType, MetadataSchema, MetadataType, RulesetSchema};
pub use update::{update_page_metadata, MetadataSummary, UpdateOptions};
