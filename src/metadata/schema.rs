//! Schema capability for the structural-metadata document
//!
//! The document model never hard-codes a schema. Every metadata field and
//! structure node is typed by symbolic name, and the names are resolved
//! through the [`MetadataSchema`] trait so another document-model backend
//! can supply its own definitions.

use std::collections::HashMap;

// Symbolic names used by the placeholder flow
pub const STRUCT_PAGE: &str = "page";
pub const MD_PHYSICAL_ORDER: &str = "physPageNumber";
pub const MD_LOGICAL_ORDER: &str = "logicalPageNumber";
pub const MD_IDENTIFIER: &str = "identifier";
pub const MD_IMAGE_FOLDER: &str = "pathimagefiles";
pub const MD_PAGE_COUNT: &str = "numberOfPages";

/// Reference relation linking a logical structure to its physical pages
pub const REL_LOGICAL_PHYSICAL: &str = "logical_physical";

/// A metadata field definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataType {
    pub name: String,
}

/// A structure node definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocStructType {
    pub name: String,
    /// Anchor types are multi-volume containers whose real content lives in
    /// child structures
    pub anchor: bool,
    /// Metadata type names that may be attached to nodes of this type
    pub allowed_metadata: Vec<String>,
}

impl DocStructType {
    pub fn allows_metadata(&self, name: &str) -> bool {
        self.allowed_metadata.iter().any(|m| m == name)
    }
}

/// Typed, name-keyed lookups into a metadata schema
pub trait MetadataSchema {
    /// Look up a metadata field definition by symbolic name
    fn metadata_type(&self, name: &str) -> Option<&MetadataType>;

    /// Look up a structure definition by symbolic name
    fn doc_struct_type(&self, name: &str) -> Option<&DocStructType>;
}

/// In-memory schema built from registered definitions
#[derive(Debug, Clone, Default)]
pub struct RulesetSchema {
    metadata_types: HashMap<String, MetadataType>,
    struct_types: HashMap<String, DocStructType>,
}

impl RulesetSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metadata type
    pub fn add_metadata_type(&mut self, name: &str) -> &mut Self {
        self.metadata_types.insert(
            name.to_string(),
            MetadataType {
                name: name.to_string(),
            },
        );
        self
    }

    /// Register a structure type
    pub fn add_struct_type(&mut self, name: &str, anchor: bool, allowed_metadata: &[&str]) -> &mut Self {
        self.struct_types.insert(
            name.to_string(),
            DocStructType {
                name: name.to_string(),
                anchor,
                allowed_metadata: allowed_metadata.iter().map(|m| m.to_string()).collect(),
            },
        );
        self
    }

    /// The standard digitization ruleset used by the placeholder step
    pub fn digitization_defaults() -> Self {
        let mut schema = Self::new();
        schema
            .add_metadata_type(MD_PHYSICAL_ORDER)
            .add_metadata_type(MD_LOGICAL_ORDER)
            .add_metadata_type(MD_IDENTIFIER)
            .add_metadata_type(MD_IMAGE_FOLDER)
            .add_metadata_type(MD_PAGE_COUNT);
        schema
            .add_struct_type(
                STRUCT_PAGE,
                false,
                &[MD_PHYSICAL_ORDER, MD_LOGICAL_ORDER, MD_IDENTIFIER],
            )
            .add_struct_type("BoundBook", false, &[MD_IMAGE_FOLDER])
            .add_struct_type("Binding", false, &[MD_IMAGE_FOLDER])
            .add_struct_type("Monograph", false, &[MD_IDENTIFIER, MD_PAGE_COUNT])
            .add_struct_type("Manuscript", false, &[MD_IDENTIFIER, MD_PAGE_COUNT])
            .add_struct_type("Volume", false, &[MD_IDENTIFIER, MD_PAGE_COUNT])
            .add_struct_type("MultiVolumeWork", true, &[MD_IDENTIFIER]);
        schema
    }
}

impl MetadataSchema for RulesetSchema {
    fn metadata_type(&self, name: &str) -> Option<&MetadataType> {
        self.metadata_types.get(name)
    }

    fn doc_struct_type(&self, name: &str) -> Option<&DocStructType> {
        self.struct_types.get(name)
    }
}
