//! In-memory structural-metadata document
//!
//! A document is a tree with a logical branch (the intellectual structure
//! of the work) and a physical branch (the page sequence). Nodes carry
//! typed key/value metadata and optional content-file references; links
//! between the branches are kept at the document level, keyed by node id.
//!
//! Every mutation that attaches a type goes through a [`MetadataSchema`],
//! so a field or structure the schema does not know is rejected instead of
//! silently written.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metadata::schema::MetadataSchema;

/// One typed metadata field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub type_name: String,
    pub value: String,
}

/// Pointer from a node to an image file location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFile {
    pub location: String,
    pub mime_type: String,
}

/// Named relation between two nodes, by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructLink {
    pub relation: String,
    pub from: String,
    pub to: String,
}

/// One node of the structure tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocStruct {
    pub id: String,
    pub type_name: String,
    #[serde(default)]
    metadata: Vec<Metadata>,
    #[serde(default)]
    content_files: Vec<ContentFile>,
    #[serde(default)]
    pub children: Vec<DocStruct>,
}

impl DocStruct {
    /// Attach a metadata field, validated against the schema.
    ///
    /// Fails when the metadata type is unknown or not allowed on this
    /// node's structure type.
    pub fn add_metadata(
        &mut self,
        schema: &dyn MetadataSchema,
        type_name: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        if schema.metadata_type(type_name).is_none() {
            return Err(Error::UnknownMetadataType(type_name.to_string()));
        }
        let struct_type = schema
            .doc_struct_type(&self.type_name)
            .ok_or_else(|| Error::UnknownStructType(self.type_name.clone()))?;
        if !struct_type.allows_metadata(type_name) {
            return Err(Error::MetadataNotAllowed {
                metadata: type_name.to_string(),
                structure: self.type_name.clone(),
            });
        }
        self.metadata.push(Metadata {
            type_name: type_name.to_string(),
            value: value.into(),
        });
        Ok(())
    }

    /// Set a single-valued metadata field, replacing an existing value
    pub fn set_metadata(
        &mut self,
        schema: &dyn MetadataSchema,
        type_name: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        if let Some(existing) = self.metadata.iter_mut().find(|m| m.type_name == type_name) {
            existing.value = value.into();
            return Ok(());
        }
        self.add_metadata(schema, type_name, value)
    }

    /// First value of the given metadata type, if present
    pub fn metadata_value(&self, type_name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.type_name == type_name)
            .map(|m| m.value.as_str())
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    pub fn add_content_file(&mut self, location: impl Into<String>, mime_type: impl Into<String>) {
        self.content_files.push(ContentFile {
            location: location.into(),
            mime_type: mime_type.into(),
        });
    }

    pub fn content_files(&self) -> &[ContentFile] {
        &self.content_files
    }

    fn find(&self, id: &str) -> Option<&DocStruct> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut DocStruct> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }
}

/// The structural-metadata document of one process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    logical: DocStruct,
    physical: Option<DocStruct>,
    #[serde(default)]
    links: Vec<StructLink>,
    next_id: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Start a new document with a logical root of the given type
    pub fn new(schema: &dyn MetadataSchema, logical_type: &str) -> Result<Self> {
        if schema.doc_struct_type(logical_type).is_none() {
            return Err(Error::UnknownStructType(logical_type.to_string()));
        }
        Ok(Self {
            logical: DocStruct {
                id: "DS_0000".to_string(),
                type_name: logical_type.to_string(),
                metadata: Vec::new(),
                content_files: Vec::new(),
                children: Vec::new(),
            },
            physical: None,
            links: Vec::new(),
            next_id: 1,
            saved_at: None,
        })
    }

    /// Create an unattached node of the given structure type
    pub fn create_struct(
        &mut self,
        schema: &dyn MetadataSchema,
        type_name: &str,
    ) -> Result<DocStruct> {
        if schema.doc_struct_type(type_name).is_none() {
            return Err(Error::UnknownStructType(type_name.to_string()));
        }
        let id = format!("DS_{:04}", self.next_id);
        self.next_id += 1;
        Ok(DocStruct {
            id,
            type_name: type_name.to_string(),
            metadata: Vec::new(),
            content_files: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn logical(&self) -> &DocStruct {
        &self.logical
    }

    pub fn logical_mut(&mut self) -> &mut DocStruct {
        &mut self.logical
    }

    pub fn physical(&self) -> Option<&DocStruct> {
        self.physical.as_ref()
    }

    pub fn physical_mut(&mut self) -> Option<&mut DocStruct> {
        self.physical.as_mut()
    }

    pub fn set_physical(&mut self, root: DocStruct) {
        self.physical = Some(root);
    }

    /// The logical node that page links and the page count attach to: the
    /// logical root itself, or its first child when the root is an anchor
    /// type. An anchor without children has no target.
    pub fn logical_target_id(&self, schema: &dyn MetadataSchema) -> Result<Option<String>> {
        let root_type = schema
            .doc_struct_type(&self.logical.type_name)
            .ok_or_else(|| Error::UnknownStructType(self.logical.type_name.clone()))?;
        if !root_type.anchor {
            return Ok(Some(self.logical.id.clone()));
        }
        Ok(self.logical.children.first().map(|c| c.id.clone()))
    }

    /// Find a node anywhere in the document by id
    pub fn find(&self, id: &str) -> Option<&DocStruct> {
        self.logical
            .find(id)
            .or_else(|| self.physical.as_ref().and_then(|p| p.find(id)))
    }

    /// Find a node anywhere in the document by id, mutably
    pub fn find_mut(&mut self, id: &str) -> Option<&mut DocStruct> {
        if self.logical.find(id).is_some() {
            return self.logical.find_mut(id);
        }
        self.physical.as_mut().and_then(|p| p.find_mut(id))
    }

    /// Record a named relation between two nodes
    pub fn add_link(&mut self, relation: &str, from: &str, to: &str) {
        self.links.push(StructLink {
            relation: relation.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn links(&self) -> &[StructLink] {
        &self.links
    }

    /// Drop links whose endpoints no longer exist in the tree
    pub fn prune_links(&mut self) {
        let keep: Vec<bool> = self
            .links
            .iter()
            .map(|l| self.find(&l.from).is_some() && self.find(&l.to).is_some())
            .collect();
        let mut keep = keep.into_iter();
        self.links.retain(|_| keep.next().unwrap_or(false));
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Load a persisted document
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist the document, stamping the save time.
    ///
    /// The file is rewritten in place; there is no concurrency check
    /// against other writers.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.saved_at = Some(Utc::now());
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
