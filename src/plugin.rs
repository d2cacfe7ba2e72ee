//! Step plugin lifecycle
//!
//! Ties the pieces together the way the workflow engine drives them:
//! `initialize` binds a process and reads the step configuration, then
//! `create_placeholder_images` validates the page-count input and fills
//! every configured folder.
//!
//! Image stamping and metadata updating are reported as two independent
//! outcomes per folder. A failed metadata update is logged and carried in
//! the report; it never hides the image result.

use std::path::PathBuf;

use log::{error, info};

use crate::config::StepConfig;
use crate::error::{Error, Result};
use crate::metadata::schema::RulesetSchema;
use crate::metadata::update::{update_page_metadata, MetadataSummary, UpdateOptions};
use crate::process::{prepare_folder, Process};
use crate::stamp::{stamp_folder, StampOptions};
use crate::validate::validate_page_count;

/// Name this plugin registers under in the workflow engine
pub const PLUGIN_NAME: &str = "placeholder-creation";

/// Value handed back to the workflow engine after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginReturn {
    Finished,
    Error,
}

/// Outcome for one configured folder
#[derive(Debug)]
pub struct FolderReport {
    /// Logical folder name from the configuration
    pub folder: String,
    /// Resolved folder path
    pub path: PathBuf,
    /// Number of placeholder images written
    pub images_written: usize,
    /// Outcome of the metadata update, independent of the image result
    pub metadata: Result<MetadataSummary>,
}

/// Outcome of one full step run
#[derive(Debug)]
pub struct RunReport {
    pub folders: Vec<FolderReport>,
}

impl RunReport {
    /// Total number of images written across all folders
    pub fn images_written(&self) -> usize {
        self.folders.iter().map(|f| f.images_written).sum()
    }

    /// User-facing summary of the image stage
    pub fn image_message(&self) -> String {
        match self.images_written() {
            1 => "Created 1 image.".to_string(),
            n => format!("Created {} images.", n),
        }
    }

    /// User-facing status of the metadata stage, one line per folder
    pub fn metadata_messages(&self) -> Vec<String> {
        self.folders
            .iter()
            .map(|f| match &f.metadata {
                Ok(summary) => format!(
                    "Linked {} pages of {} in the metadata document.",
                    summary.pages_linked, f.folder
                ),
                Err(e) => format!("Metadata update failed for {}: {}", f.folder, e),
            })
            .collect()
    }

    /// True when every folder's metadata update went through
    pub fn metadata_ok(&self) -> bool {
        self.folders.iter().all(|f| f.metadata.is_ok())
    }
}

/// The placeholder-creation step bound to one process
#[derive(Debug)]
pub struct PlaceholderStep {
    process: Process,
    config: StepConfig,
    return_path: Option<String>,
    /// Raw page-count input from the host form field
    pub number_of_pages: Option<String>,
}

impl PlaceholderStep {
    /// Bind the step to a process, reading the step configuration once
    pub fn initialize(process: Process, return_path: Option<String>) -> Result<Self> {
        let config = StepConfig::load_for_process(&process.directory)?;
        Ok(Self::with_config(process, config, return_path))
    }

    /// Bind the step with an explicit configuration
    pub fn with_config(process: Process, config: StepConfig, return_path: Option<String>) -> Self {
        Self {
            process,
            config,
            return_path,
            number_of_pages: None,
        }
    }

    pub fn title(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn process(&self) -> &Process {
        &self.process
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn return_path(&self) -> Option<&str> {
        self.return_path.as_deref()
    }

    /// Validate the page-count input and fill every configured folder.
    ///
    /// Folder preparation or stamping failures abort the run; folders
    /// already written stay as they are. Metadata failures are collected
    /// per folder instead of aborting.
    pub fn create_placeholder_images(&self) -> Result<RunReport> {
        let raw = self.number_of_pages.as_deref().unwrap_or("");
        let count = validate_page_count(raw)?;

        let template = self
            .config
            .template
            .clone()
            .ok_or_else(|| Error::General("No placeholder template configured".to_string()))?;
        let stamp_options = StampOptions {
            template,
            format: self.config.image_format,
            font: self.config.font.clone(),
        };
        let update_options = UpdateOptions {
            physical_root_type: self.config.physical_root_type.clone(),
            logical_root_type: self.config.logical_root_type.clone(),
        };
        let schema = RulesetSchema::digitization_defaults();

        let mut folders = Vec::new();
        for name in &self.config.folders {
            let path = self.process.image_folder(name);
            prepare_folder(&path, self.config.delete_existing).map_err(|e| {
                error!("cannot prepare folder {}: {}", path.display(), e);
                e
            })?;

            info!(
                "stamping {} placeholder images into {}",
                count,
                path.display()
            );
            let images_written = stamp_folder(&path, count, &stamp_options)?;

            let metadata =
                update_page_metadata(&self.process, &path, &schema, &update_options).map_err(|e| {
                    error!("metadata update failed for {}: {}", path.display(), e);
                    e
                });

            folders.push(FolderReport {
                folder: name.clone(),
                path,
                images_written,
                metadata,
            });
        }

        Ok(RunReport { folders })
    }

    /// Drive a full run and map the image-stage outcome onto the plugin
    /// return value the workflow engine consumes.
    pub fn execute(&self) -> PluginReturn {
        match self.create_placeholder_images() {
            Ok(report) => {
                info!("{}", report.image_message());
                for line in report.metadata_messages() {
                    info!("{}", line);
                }
                PluginReturn::Finished
            }
            Err(e) => {
                error!("placeholder creation failed: {}", e);
                PluginReturn::Error
            }
        }
    }
}
