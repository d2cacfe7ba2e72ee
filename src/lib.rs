//! Placeholder Pages Library
//!
//! Generates placeholder page images for a digitized work whose physical
//! scans are not available yet, and keeps the work's structural-metadata
//! document in step. This library provides functionality to:
//! - Stamp sequential page numbers onto copies of a template image
//! - Prepare and fill one or more configured image folders
//! - Rebuild the physical page sequence of a structural-metadata document
//! - Validate the page-count form input of the host UI
//!
//! # Example
//!
//! ```no_run
//! use placeholder_pages::plugin::PlaceholderStep;
//! use placeholder_pages::process::Process;
//!
//! let process = Process::from_directory("/var/processes/vd18_0042").expect("process");
//! let mut step = PlaceholderStep::initialize(process, None).expect("config");
//! step.number_of_pages = Some("12".to_string());
//!
//! let report = step.create_placeholder_images().expect("run failed");
//! println!("{}", report.image_message());
//! for line in report.metadata_messages() {
//!     println!("{}", line);
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod plugin;
pub mod process;
pub mod stamp;
pub mod validate;

// Re-export commonly used items
pub use error::{Error, Result};
pub use validate::{validate_page_count, ValidationError};
