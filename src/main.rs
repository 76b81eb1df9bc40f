//! CLI entry point for jekyll-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jekyll-rs")]
#[command(version)]
#[command(about = "A static site generator for Jekyll-style sites", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site into the destination directory
    #[command(alias = "b")]
    Build {
        /// Source directory (overrides `source` in _config.yml)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Destination directory (overrides `destination` in _config.yml)
        #[arg(long)]
        destination: Option<PathBuf>,
    },

    /// Remove the destination directory
    Clean,

    /// List site information
    List {
        /// Type of content to list (posts, pages, layouts, files, categories, topics)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "jekyll_rs=debug,info"
    } else {
        "jekyll_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build {
            source,
            destination,
        } => {
            let mut jekyll = jekyll_rs::Jekyll::new(&base_dir)?;
            if let Some(source) = source {
                jekyll = jekyll.with_source(source);
            }
            if let Some(destination) = destination {
                jekyll = jekyll.with_destination(destination);
            }

            tracing::info!("Building {:?}...", jekyll.source_dir);
            let summary = jekyll.build()?;
            println!(
                "Built {} posts ({} unpublished skipped), {} pages, {} static files with {} layouts",
                summary.posts, summary.unpublished, summary.pages, summary.files, summary.layouts
            );
        }

        Commands::Clean => {
            let jekyll = jekyll_rs::Jekyll::new(&base_dir)?;
            tracing::info!("Cleaning destination folder...");
            jekyll.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let jekyll = jekyll_rs::Jekyll::new(&base_dir)?;
            jekyll_rs::commands::list::run(&jekyll, &r#type)?;
        }

        Commands::Version => {
            println!("jekyll-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
