//! Process context and image-folder handling
//!
//! A process is one digitized work item: a directory owning an image folder
//! hierarchy and a structural-metadata document. The workflow engine hands a
//! process to the step; this module resolves its configured folders and
//! prepares them for stamping.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};

/// Name of the persisted structural-metadata document inside a process
pub const METADATA_FILE_NAME: &str = "meta.json";

/// One digitized work item
#[derive(Debug, Clone)]
pub struct Process {
    /// Title of the work, also used as the identifier prefix for pages
    pub title: String,
    /// Root directory of the process
    pub directory: PathBuf,
}

impl Process {
    /// Create a process context rooted at the given directory.
    ///
    /// The title defaults to the directory's file name when not supplied by
    /// the host.
    pub fn new(title: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            directory: directory.into(),
        }
    }

    /// Derive a process from a directory alone, titling it after the
    /// directory name.
    pub fn from_directory(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        let title = directory
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::General(format!(
                    "Cannot derive a process title from {}",
                    directory.display()
                ))
            })?
            .to_string();
        Ok(Self { title, directory })
    }

    /// Directory holding all image folders of this process
    pub fn images_dir(&self) -> PathBuf {
        self.directory.join("images")
    }

    /// Resolve a logical folder name to its path, `<title>_<name>` under
    /// the images directory.
    pub fn image_folder(&self, name: &str) -> PathBuf {
        self.images_dir().join(format!("{}_{}", self.title, name))
    }

    /// Path of the structural-metadata document
    pub fn metadata_path(&self) -> PathBuf {
        self.directory.join(METADATA_FILE_NAME)
    }
}

/// Create an image folder if absent and optionally clear its contents.
///
/// Clearing removes files and subtrees alike, so a rerun with
/// `delete_existing` always starts from an empty folder. Any failure here
/// aborts the run before an image is written; folders prepared earlier in
/// the same run are left as they are.
pub fn prepare_folder(path: &Path, delete_existing: bool) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| Error::FolderPreparation(path.to_path_buf(), e.to_string()))?;

    if delete_existing {
        info!("clearing existing content of {}", path.display());
        for entry in fs::read_dir(path)
            .map_err(|e| Error::FolderPreparation(path.to_path_buf(), e.to_string()))?
        {
            let entry =
                entry.map_err(|e| Error::FolderPreparation(path.to_path_buf(), e.to_string()))?;
            let entry_path = entry.path();
            let result = if entry_path.is_dir() {
                fs::remove_dir_all(&entry_path)
            } else {
                fs::remove_file(&entry_path)
            };
            result.map_err(|e| Error::FolderPreparation(entry_path.clone(), e.to_string()))?;
        }
    }

    Ok(())
}

/// List the files of a folder in host filesystem order.
///
/// The listing order is whatever the filesystem yields; it is not sorted,
/// matching how the host enumerates image folders. Directories are skipped.
pub fn list_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            warn!("skipping non-file entry {}", path.display());
        }
    }
    Ok(files)
}

/// Render a path as a `file://` URL.
///
/// Always the three-slash absolute form, on every platform.
pub fn file_url(path: &Path) -> String {
    let mut text = path.display().to_string();
    if cfg!(windows) {
        text = text.replace('\\', "/");
    }
    if text.starts_with('/') {
        format!("file://{}", text)
    } else {
        format!("file:///{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_folder_resolution() {
        let process = Process::new("vd18_0042", "/var/processes/vd18_0042");
        assert_eq!(
            process.image_folder("master"),
            PathBuf::from("/var/processes/vd18_0042/images/vd18_0042_master")
        );
        assert_eq!(
            process.metadata_path(),
            PathBuf::from("/var/processes/vd18_0042/meta.json")
        );
    }

    #[test]
    fn test_title_from_directory() {
        let process = Process::from_directory("/var/processes/ms_theol_12").unwrap();
        assert_eq!(process.title, "ms_theol_12");
    }

    #[test]
    fn test_prepare_creates_missing_folder() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("images").join("work_master");
        prepare_folder(&folder, false).unwrap();
        assert!(folder.is_dir());
    }

    #[test]
    fn test_prepare_keeps_content_without_delete_flag() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().to_path_buf();
        fs::write(folder.join("00000001.png"), b"x").unwrap();

        prepare_folder(&folder, false).unwrap();
        assert!(folder.join("00000001.png").exists());
    }

    #[test]
    fn test_prepare_clears_content_with_delete_flag() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().to_path_buf();
        fs::write(folder.join("00000001.png"), b"x").unwrap();
        fs::create_dir(folder.join("thumbs")).unwrap();
        fs::write(folder.join("thumbs").join("t.png"), b"x").unwrap();

        prepare_folder(&folder, true).unwrap();
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 0);

        // Preparing an already-empty folder again changes nothing
        prepare_folder(&folder, true).unwrap();
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 0);
    }

    #[test]
    fn test_list_files_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.png"), b"x").unwrap();
        fs::write(tmp.path().join("b.png"), b"x").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let files = list_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    #[cfg(unix)]
    fn test_file_url_form() {
        let url = file_url(Path::new("/var/processes/work/images/work_master"));
        assert_eq!(url, "file:///var/processes/work/images/work_master");
        assert!(url.starts_with("file://"));
    }
}
