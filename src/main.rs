//! layerloc - Stable, layer-aware file locations.
//!
//! Usage:
//!   layerloc list [PATH]          List file locations under a directory
//!   layerloc id <PATH>            Print the artifact id of a path
//!   layerloc --help               Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use layerloc_core::{
    CatalogEntry, FileReference, Identifiable, LayerMetadata, Location, MemoryCatalog,
    SourceMetadata,
};
use layerloc_scan::{DirectoryResolver, ResolverConfig};

#[derive(Parser)]
#[command(
    name = "layerloc",
    version,
    about = "Stable, layer-aware file locations",
    long_about = "layerloc resolves files to locations and derives artifact ids \
                  from their real path and owning layer."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List file locations under a directory
    List {
        /// Directory to resolve
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Descend into symlinked directories
        #[arg(short = 'L', long)]
        follow_symlinks: bool,

        /// Skip hidden files
        #[arg(long)]
        no_hidden: bool,

        /// Maximum depth to traverse
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the artifact id of a path
    Id {
        /// Real path of the file
        path: String,

        /// Owning layer digest (e.g. "sha256:...")
        #[arg(short, long)]
        layer: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List {
            path,
            follow_symlinks,
            no_hidden,
            max_depth,
            format,
        } => {
            run_list(path, follow_symlinks, !no_hidden, max_depth, format)?;
        }
        Command::Id { path, layer } => {
            run_id(&path, layer.as_deref());
        }
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve a directory and print its locations.
fn run_list(
    path: PathBuf,
    follow_symlinks: bool,
    include_hidden: bool,
    max_depth: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let config = ResolverConfig::builder()
        .root(path)
        .follow_symlinks(follow_symlinks)
        .include_hidden(include_hidden)
        .max_depth(max_depth)
        .build()
        .context("Invalid configuration")?;

    let resolution = DirectoryResolver::new()
        .resolve(&config)
        .context("Resolve failed")?;

    tracing::debug!(
        "resolved {} locations under {} ({} skipped)",
        resolution.locations.len(),
        resolution.root.display(),
        resolution.warnings.len()
    );

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(" {} - {} locations", resolution.root.display(), resolution.locations.len());
            println!("{}", "─".repeat(70));
            println!();

            for location in resolution.locations.iter() {
                println!(" {:<16}  {}", location.id(), location);
            }

            if resolution.has_warnings() {
                println!();
                println!("{} entries skipped", resolution.warnings.len());
            }
        }
        OutputFormat::Json => {
            let document = ListDocument {
                source: resolution.metadata(),
                locations: resolution
                    .locations
                    .iter()
                    .map(|location| LocationEntry {
                        id: location.id().to_string(),
                        location,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}

/// Print the artifact id for a path, optionally owned by an image layer.
fn run_id(path: &str, layer: Option<&str>) {
    let location = match layer {
        Some(digest) => {
            let reference = FileReference::new(1, path);
            let catalog = MemoryCatalog::new();
            catalog.insert(&reference, CatalogEntry::new(LayerMetadata::new(0, digest)));
            Location::from_image(path, reference, &catalog)
        }
        None => Location::new(path),
    };
    println!("{}", location.id());
}

#[derive(Serialize)]
struct ListDocument<'a> {
    source: SourceMetadata,
    locations: Vec<LocationEntry<'a>>,
}

#[derive(Serialize)]
struct LocationEntry<'a> {
    id: String,
    #[serde(flatten)]
    location: &'a Location,
}
