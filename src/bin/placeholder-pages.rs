//! Placeholder Pages CLI tool
//!
//! Fills a process's image folders with numbered placeholder pages and
//! updates its structural-metadata document.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use placeholder_pages::config::StepConfig;
use placeholder_pages::metadata::document::Document;
use placeholder_pages::metadata::schema::MD_PAGE_COUNT;
use placeholder_pages::plugin::PlaceholderStep;
use placeholder_pages::process::Process;

/// Placeholder Pages - stamp placeholder page images and metadata
#[derive(Parser)]
#[command(name = "placeholder-pages")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Create 12 placeholder pages in the configured folders
    placeholder-pages create /var/processes/vd18_0042 --pages 12

    # Fill a specific folder, clearing previous content first
    placeholder-pages create /var/processes/vd18_0042 --pages 8 --folder media --delete-existing

    # Use an explicit template image
    placeholder-pages create /var/processes/vd18_0042 --pages 3 --template ./placeholder.png

    # Show what the metadata document currently records
    placeholder-pages info /var/processes/vd18_0042")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create placeholder page images and update the metadata document
    Create {
        /// Process directory (owns the image folders and meta.json)
        process_dir: PathBuf,

        /// Number of pages to create (validated like the host form field)
        #[arg(short, long)]
        pages: String,

        /// Configuration file (default: <process-dir>/placeholder.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Logical folder name to fill; repeat for several (overrides config)
        #[arg(long = "folder")]
        folders: Vec<String>,

        /// Remove existing folder contents before stamping
        #[arg(long)]
        delete_existing: bool,

        /// Placeholder template image (overrides config)
        #[arg(long)]
        template: Option<PathBuf>,

        /// TTF for the page-number stamp (overrides config)
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Show what the metadata document records for a process
    Info {
        /// Process directory
        process_dir: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            process_dir,
            pages,
            config,
            folders,
            delete_existing,
            template,
            font,
        } => cmd_create(
            process_dir,
            pages,
            config,
            folders,
            delete_existing,
            template,
            font,
        ),
        Commands::Info { process_dir } => cmd_info(process_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Run the placeholder step for one process
fn cmd_create(
    process_dir: PathBuf,
    pages: String,
    config_path: Option<PathBuf>,
    folders: Vec<String>,
    delete_existing: bool,
    template: Option<PathBuf>,
    font: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !process_dir.is_dir() {
        anyhow::bail!("Process directory not found: {}", process_dir.display());
    }

    let process = Process::from_directory(&process_dir)?;

    let mut config = match config_path {
        Some(path) => StepConfig::load(&path)?,
        None => StepConfig::load_for_process(&process_dir)?,
    };
    if !folders.is_empty() {
        config.folders = folders;
    }
    if delete_existing {
        config.delete_existing = true;
    }
    if template.is_some() {
        config.template = template;
    }
    if font.is_some() {
        config.font = font;
    }

    let mut step = PlaceholderStep::with_config(process, config, None);
    step.number_of_pages = Some(pages);

    eprintln!("Creating placeholder images...");
    let report = step.create_placeholder_images()?;

    println!("{}", report.image_message());
    for line in report.metadata_messages() {
        println!("{}", line);
    }

    Ok(())
}

/// Show a summary of the persisted metadata document
fn cmd_info(process_dir: PathBuf) -> anyhow::Result<()> {
    let process = Process::from_directory(&process_dir)?;
    let path = process.metadata_path();
    if !path.exists() {
        anyhow::bail!("No metadata document at {}", path.display());
    }

    let doc = Document::load(&path)?;

    println!("Process: {}", process.title);
    println!("Logical type: {}", doc.logical().type_name);
    if let Some(count) = doc.logical().metadata_value(MD_PAGE_COUNT) {
        println!("Page count: {}", count);
    }
    match doc.physical() {
        Some(physical) => {
            println!("Physical type: {}", physical.type_name);
            println!("Physical pages: {}", physical.children.len());
        }
        None => println!("Physical pages: none"),
    }
    if let Some(saved) = doc.saved_at() {
        println!("Last saved: {}", saved.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}
