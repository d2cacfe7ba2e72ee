//! Integration tests for the placeholder-pages library

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use placeholder_pages::config::{ImageFormat, StepConfig};
use placeholder_pages::metadata::document::Document;
use placeholder_pages::metadata::schema::{MD_IDENTIFIER, MD_PAGE_COUNT, MD_PHYSICAL_ORDER};
use placeholder_pages::plugin::{PlaceholderStep, PluginReturn};
use placeholder_pages::process::Process;
use placeholder_pages::stamp;

/// Build a process directory and a template image to stamp from
fn setup_process(tmp: &TempDir) -> (Process, PathBuf) {
    let process_dir = tmp.path().join("vd18_0042");
    fs::create_dir_all(&process_dir).unwrap();

    let template_path = tmp.path().join("placeholder.png");
    RgbaImage::from_pixel(600, 800, Rgba([235, 235, 235, 255]))
        .save(&template_path)
        .unwrap();

    let process = Process::from_directory(&process_dir).unwrap();
    (process, template_path)
}

fn step_config(template: &Path, folders: &[&str], delete_existing: bool) -> StepConfig {
    StepConfig {
        folders: folders.iter().map(|f| f.to_string()).collect(),
        delete_existing,
        template: Some(template.to_path_buf()),
        ..StepConfig::default()
    }
}

/// Stamping needs a system font; skip those tests when none is installed,
/// the same way missing test fixtures are skipped.
fn font_available() -> bool {
    if stamp::load_font(None).is_ok() {
        true
    } else {
        eprintln!("Skipping test: no system TTF available");
        false
    }
}

#[test]
fn test_full_run_creates_images_and_metadata() {
    if !font_available() {
        return;
    }

    let tmp = TempDir::new().unwrap();
    let (process, template) = setup_process(&tmp);

    let mut step = PlaceholderStep::with_config(
        process.clone(),
        step_config(&template, &["master"], false),
        None,
    );
    step.number_of_pages = Some("3".to_string());

    let report = step.create_placeholder_images().expect("run failed");
    assert_eq!(report.images_written(), 3);
    assert_eq!(report.image_message(), "Created 3 images.");
    assert!(report.metadata_ok());

    // Exactly the three expected files, 8-digit zero-padded
    let folder = process.image_folder("master");
    for index in 1..=3u32 {
        assert!(folder.join(format!("{:08}.png", index)).exists());
    }
    assert_eq!(fs::read_dir(&folder).unwrap().count(), 3);

    // Metadata document references every generated page
    let doc = Document::load(&process.metadata_path()).unwrap();
    let physical = doc.physical().expect("physical root");
    assert_eq!(physical.children.len(), 3);
    for (index, page) in physical.children.iter().enumerate() {
        let order = index + 1;
        assert_eq!(
            page.metadata_value(MD_PHYSICAL_ORDER),
            Some(order.to_string().as_str())
        );
        assert_eq!(
            page.metadata_value(MD_IDENTIFIER),
            Some(format!("vd18_0042_{:04}", order).as_str())
        );
        let location = &page.content_files()[0].location;
        assert!(
            location.starts_with("file://"),
            "unexpected location {}",
            location
        );
    }
    assert_eq!(doc.logical().metadata_value(MD_PAGE_COUNT), Some("3"));
    assert_eq!(doc.links().len(), 3);
}

#[test]
fn test_multi_folder_run() {
    if !font_available() {
        return;
    }

    let tmp = TempDir::new().unwrap();
    let (process, template) = setup_process(&tmp);

    let mut step = PlaceholderStep::with_config(
        process.clone(),
        step_config(&template, &["master", "media"], false),
        None,
    );
    step.number_of_pages = Some("2".to_string());

    let report = step.create_placeholder_images().expect("run failed");
    assert_eq!(report.folders.len(), 2);
    assert_eq!(report.images_written(), 4);
    assert_eq!(report.image_message(), "Created 4 images.");

    for name in ["master", "media"] {
        let folder = process.image_folder(name);
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 2);
    }
}

#[test]
fn test_rerun_with_delete_existing_is_idempotent() {
    if !font_available() {
        return;
    }

    let tmp = TempDir::new().unwrap();
    let (process, template) = setup_process(&tmp);

    let config = step_config(&template, &["master"], true);
    let mut step = PlaceholderStep::with_config(process.clone(), config, None);
    step.number_of_pages = Some("4".to_string());

    step.create_placeholder_images().expect("first run failed");
    let folder = process.image_folder("master");
    // A stray file from an earlier, larger run
    fs::write(folder.join("00000099.png"), b"stale").unwrap();

    let report = step.create_placeholder_images().expect("second run failed");
    assert_eq!(report.images_written(), 4);

    let mut names: Vec<String> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["00000001.png", "00000002.png", "00000003.png", "00000004.png"]
    );

    // Metadata tracks the cleaned folder, not the stale file
    let doc = Document::load(&process.metadata_path()).unwrap();
    assert_eq!(doc.physical().unwrap().children.len(), 4);
    assert_eq!(doc.logical().metadata_value(MD_PAGE_COUNT), Some("4"));
}

#[test]
fn test_tif_output_naming() {
    if !font_available() {
        return;
    }

    let tmp = TempDir::new().unwrap();
    let (process, template) = setup_process(&tmp);

    let mut config = step_config(&template, &["master"], false);
    config.image_format = ImageFormat::Tif;
    let mut step = PlaceholderStep::with_config(process.clone(), config, None);
    step.number_of_pages = Some("1".to_string());

    let report = step.create_placeholder_images().expect("run failed");
    assert_eq!(report.image_message(), "Created 1 image.");
    assert!(process
        .image_folder("master")
        .join("00000001.tif")
        .exists());
}

#[test]
fn test_invalid_page_count_aborts_before_writing() {
    let tmp = TempDir::new().unwrap();
    let (process, template) = setup_process(&tmp);

    let mut step = PlaceholderStep::with_config(
        process.clone(),
        step_config(&template, &["master"], false),
        None,
    );
    step.number_of_pages = Some("12a".to_string());

    let err = step.create_placeholder_images().unwrap_err();
    assert_eq!(err.to_string(), "Only numbers are allowed.");
    assert!(!process.image_folder("master").exists());
    assert_eq!(step.execute(), PluginReturn::Error);
}

#[test]
fn test_missing_template_aborts_run() {
    let tmp = TempDir::new().unwrap();
    let (process, _template) = setup_process(&tmp);

    let config = step_config(&tmp.path().join("no-such-template.png"), &["master"], false);
    let mut step = PlaceholderStep::with_config(process, config, None);
    step.number_of_pages = Some("2".to_string());

    let err = step.create_placeholder_images().unwrap_err();
    assert!(err.to_string().contains("Template image not found"));
}
