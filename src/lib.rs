//! jekyll-rs: a static site generator for Jekyll-style source trees
//!
//! Files with front matter are converted (Markdown to HTML), wrapped in their
//! chain of layouts with Tera templates, and written into a destination
//! directory next to the copied static files.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod site;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// The main Jekyll application
#[derive(Debug, Clone)]
pub struct Jekyll {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Destination (output) directory
    pub dest_dir: PathBuf,
}

impl Jekyll {
    /// Create a new instance from a directory holding an optional
    /// `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source);
        let dest_dir = base_dir.join(&config.destination);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            dest_dir,
        })
    }

    /// Override the source directory, relative to the base directory
    pub fn with_source<P: AsRef<Path>>(mut self, source: P) -> Self {
        self.source_dir = self.base_dir.join(source);
        self
    }

    /// Override the destination directory, relative to the base directory
    pub fn with_destination<P: AsRef<Path>>(mut self, destination: P) -> Self {
        let destination = destination.as_ref();
        self.config.destination = destination.to_string_lossy().into_owned();
        self.dest_dir = self.base_dir.join(destination);
        self
    }

    /// An empty site for the configured directories
    pub fn site(&self) -> site::Site {
        site::Site::new(self.config.clone(), &self.source_dir, &self.dest_dir)
    }

    /// Build the site
    pub fn build(&self) -> anyhow::Result<site::BuildSummary> {
        commands::build::run(self)
    }

    /// Remove the destination directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config() {
        let dir = TempDir::new().unwrap();
        let jekyll = Jekyll::new(dir.path()).unwrap();
        assert_eq!(jekyll.source_dir, dir.path().join("."));
        assert_eq!(jekyll.dest_dir, dir.path().join("_site"));
    }

    #[test]
    fn test_new_with_config_and_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "source: site\ndestination: public\n",
        )
        .unwrap();

        let jekyll = Jekyll::new(dir.path()).unwrap();
        assert_eq!(jekyll.source_dir, dir.path().join("site"));
        assert_eq!(jekyll.dest_dir, dir.path().join("public"));

        let jekyll = jekyll.with_destination("out");
        assert_eq!(jekyll.dest_dir, dir.path().join("out"));
        assert_eq!(jekyll.config.destination, "out");
    }

    #[test]
    fn test_new_with_bad_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "permalink: [").unwrap();
        assert!(Jekyll::new(dir.path()).is_err());
    }
}
