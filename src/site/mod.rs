//! Site module - scans a source tree and renders it into the destination

pub mod paths;
mod payload;
mod scan;

pub use payload::group_and_sort_by_key;
pub use scan::{is_backup, is_hidden, is_page, is_special, EntryFilter, ScanMode};

use chrono::Local;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::{ConverterRegistry, Convertible, Layout, Page, Post, Renderer};
use crate::templates::{Payload, TemplateEngine, TeraEngine};
use crate::Result;
use paths::{compute_destination, copy_file, relativize};

/// Directory whose files are posts
pub const POSTS_DIR: &str = "_posts";
/// Directory whose files are layouts
pub const LAYOUTS_DIR: &str = "_layouts";

/// Counts of what a build classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Published posts
    pub posts: usize,
    pub unpublished: usize,
    pub pages: usize,
    pub files: usize,
    pub layouts: usize,
}

/// One build of one source tree
pub struct Site {
    config: SiteConfig,
    source: PathBuf,
    dest: PathBuf,
    pub layouts: HashMap<String, Layout>,
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
    pub static_files: Vec<PathBuf>,
    converters: ConverterRegistry,
    engine: Box<dyn TemplateEngine>,
}

impl Site {
    /// Create an empty site rendering with Tera and the converters named in
    /// `config`
    pub fn new(config: SiteConfig, source: &Path, dest: &Path) -> Self {
        let converters = ConverterRegistry::from_config(&config.markdown);
        Self {
            config,
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            layouts: HashMap::new(),
            posts: Vec::new(),
            pages: Vec::new(),
            static_files: Vec::new(),
            converters,
            engine: Box::new(TeraEngine::new()),
        }
    }

    /// Replace the template engine
    pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Replace the converter registry
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Forget everything a previous scan found
    pub fn reset(&mut self) {
        self.layouts.clear();
        self.posts.clear();
        self.pages.clear();
        self.static_files.clear();
    }

    /// Posts that are rendered and listed in the site payload
    pub fn published_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|post| post.published())
    }

    pub fn summary(&self) -> BuildSummary {
        let posts = self.published_posts().count();
        BuildSummary {
            posts,
            unpublished: self.posts.len() - posts,
            pages: self.pages.len(),
            files: self.static_files.len(),
            layouts: self.layouts.len(),
        }
    }

    /// Run a full build: scan, convert posts, render and write posts and
    /// pages, then copy static files
    pub fn process(&mut self) -> Result<BuildSummary> {
        let time = Local::now();

        tracing::info!("Scanning {:?}...", self.source);
        self.reset();
        self.scan()?;
        let summary = self.summary();
        tracing::info!(
            "Found {} posts ({} unpublished), {} pages, {} static files and {} layouts",
            summary.posts,
            summary.unpublished,
            summary.pages,
            summary.files,
            summary.layouts
        );

        self.check_destinations();

        self.transform_posts()?;
        let payload = self.site_payload(time)?;

        tracing::info!("Rendering posts...");
        self.write_posts(&payload)?;

        tracing::info!("Rendering pages...");
        self.transform_pages(&payload)?;

        tracing::info!("Copying static files...");
        self.copy_files()?;

        Ok(summary)
    }

    /// Convert every published post body once
    pub fn transform_posts(&mut self) -> Result<()> {
        for post in self.posts.iter_mut().filter(|post| post.published()) {
            post.transform(&self.converters)?;
        }
        Ok(())
    }

    /// Render every published post through its layouts and write it
    pub fn write_posts(&mut self, payload: &Payload) -> Result<()> {
        let renderer = Renderer {
            layouts: &self.layouts,
            converters: &self.converters,
            engine: self.engine.as_ref(),
            strict_layouts: self.config.strict_layouts,
        };
        for post in &mut self.posts {
            if !post.published() {
                tracing::debug!("Skipping unpublished post: {:?}", post.source_path());
                continue;
            }
            post.render(payload, &renderer)?;
            post.write(&self.dest)?;
        }
        Ok(())
    }

    /// Render every page through its layouts and write it
    pub fn transform_pages(&mut self, payload: &Payload) -> Result<()> {
        let renderer = Renderer {
            layouts: &self.layouts,
            converters: &self.converters,
            engine: self.engine.as_ref(),
            strict_layouts: self.config.strict_layouts,
        };
        for page in &mut self.pages {
            page.render(payload, &renderer)?;
            page.write(&self.dest)?;
        }
        Ok(())
    }

    /// Copy static files to the same relative path under the destination
    pub fn copy_files(&self) -> Result<()> {
        for file in &self.static_files {
            let to = self.static_destination(file);
            copy_file(file, &to)?;
            tracing::debug!("Copied {:?} to {:?}", file, to);
        }
        Ok(())
    }

    fn static_destination(&self, file: &Path) -> PathBuf {
        let (dir, name) = relativize(file, &self.source);
        self.dest.join(dir).join(name)
    }

    /// Warn about outputs that would overwrite each other. Later writes win:
    /// posts, then pages, then static files.
    fn check_destinations(&self) {
        let posts = self
            .published_posts()
            .map(|post| (post.destination(&self.dest), post.source_path()));
        let pages = self.pages.iter().map(|page| {
            let extension = self.converters.output_extension(page.extension());
            let relative = compute_destination(page.dir(), page.name(), &extension);
            (self.dest.join(relative), page.source_path())
        });
        let files = self
            .static_files
            .iter()
            .map(|file| (self.static_destination(file), file.as_path()));

        let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
        for (destination, source) in posts.chain(pages).chain(files) {
            if let Some(previous) = seen.insert(destination.clone(), source) {
                tracing::warn!(
                    "{:?} is written by both {:?} and {:?}, keeping the latter",
                    destination,
                    previous,
                    source
                );
            }
        }
    }
}
