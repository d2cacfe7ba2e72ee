//! Page-metadata update after stamping
//!
//! Rebuilds the physical page sequence of a process's metadata document
//! from the current contents of one image folder and persists the result.
//! Pages carry the physical order, the "uncounted" logical order label, a
//! generated identifier, and one content-file reference per image.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::metadata::document::Document;
use crate::metadata::schema::{
    MetadataSchema, MD_IDENTIFIER, MD_IMAGE_FOLDER, MD_LOGICAL_ORDER, MD_PAGE_COUNT,
    MD_PHYSICAL_ORDER, REL_LOGICAL_PHYSICAL, STRUCT_PAGE,
};
use crate::process::{file_url, list_files, Process};

/// Logical order label of a page that has not been counted yet
pub const UNCOUNTED_LABEL: &str = "uncounted";

/// Options for one metadata update
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Structure type created when the document has no physical root
    pub physical_root_type: String,
    /// Structure type of the logical root when no document exists yet
    pub logical_root_type: String,
}

/// What a metadata update did
#[derive(Debug, Clone)]
pub struct MetadataSummary {
    /// Number of page nodes now linked under the physical root
    pub pages_linked: usize,
    /// Where the document was persisted
    pub document_path: PathBuf,
}

fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Rebuild the page metadata of a process from one image folder.
///
/// Loads the existing document or starts a new one, ensures a physical
/// root, replaces its page children with one page per file in the folder
/// (host filesystem listing order, physical order contiguous from 1), links
/// every page from the logical target, sets the page count there, and
/// persists the document.
pub fn update_page_metadata(
    process: &Process,
    folder: &Path,
    schema: &dyn MetadataSchema,
    options: &UpdateOptions,
) -> Result<MetadataSummary> {
    let document_path = process.metadata_path();
    let mut doc = if document_path.exists() {
        Document::load(&document_path)?
    } else {
        debug!("no metadata document yet, starting a new one");
        Document::new(schema, &options.logical_root_type)?
    };

    // Physical root: create of the configured type when missing, then point
    // its folder field at the image folder either way
    if doc.physical().is_none() {
        let root = doc.create_struct(schema, &options.physical_root_type)?;
        doc.set_physical(root);
    }
    let folder_url = file_url(folder);
    doc.physical_mut()
        .map(|root| root.set_metadata(schema, MD_IMAGE_FOLDER, folder_url))
        .transpose()?;

    let target_id = doc.logical_target_id(schema)?.ok_or_else(|| {
        Error::General("logical root is an anchor without a child volume".to_string())
    })?;

    let files = list_files(folder)?;

    // Stale pages from an earlier run would break the order invariant, so
    // the page sequence is rebuilt rather than extended
    if let Some(root) = doc.physical_mut() {
        root.children.retain(|c| c.type_name != STRUCT_PAGE);
    }

    for (index, file) in files.iter().enumerate() {
        let order = index + 1;
        let mut page = doc.create_struct(schema, STRUCT_PAGE)?;
        page.add_metadata(schema, MD_PHYSICAL_ORDER, order.to_string())?;
        page.add_metadata(schema, MD_LOGICAL_ORDER, UNCOUNTED_LABEL)?;
        page.add_metadata(
            schema,
            MD_IDENTIFIER,
            format!("{}_{:04}", process.title, order),
        )?;
        page.add_content_file(file_url(file), mime_type(file));

        let page_id = page.id.clone();
        if let Some(root) = doc.physical_mut() {
            root.children.push(page);
        }
        doc.add_link(REL_LOGICAL_PHYSICAL, &target_id, &page_id);
    }

    doc.find_mut(&target_id)
        .ok_or_else(|| Error::General(format!("logical target {} disappeared", target_id)))?
        .set_metadata(schema, MD_PAGE_COUNT, files.len().to_string())?;

    doc.prune_links();
    doc.save(&document_path)?;

    info!(
        "linked {} pages of {} into {}",
        files.len(),
        folder.display(),
        document_path.display()
    );

    Ok(MetadataSummary {
        pages_linked: files.len(),
        document_path,
    })
}
