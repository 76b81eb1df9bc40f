//! Source tree scanner
//!
//! Walks the source directory once, in file-name order, and sorts every file
//! into layouts, posts, pages or static files. Entering `_posts` or
//! `_layouts` switches how the files below it are classified.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{Site, LAYOUTS_DIR, POSTS_DIR};
use crate::content::{Layout, Page, Post, DELIMITER};
use crate::{Error, Result};

/// How files in the directory being visited are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Normal,
    Posts,
    Layouts,
}

impl ScanMode {
    /// Mode for the contents of a directory named `name`
    pub fn enter(self, name: &str) -> Self {
        match name {
            POSTS_DIR => ScanMode::Posts,
            LAYOUTS_DIR => ScanMode::Layouts,
            _ => self,
        }
    }
}

/// Decides which directory entries never reach classification
#[derive(Debug, Clone)]
pub struct EntryFilter {
    dest_root: PathBuf,
    dest_name: String,
}

impl EntryFilter {
    /// `dest_root` is the resolved output directory, `configured` the
    /// `destination` setting as written in the configuration
    pub fn new(dest_root: &Path, configured: &str) -> Self {
        let dest_name = configured.trim_end_matches('/').to_string();
        Self {
            dest_root: dest_root.to_path_buf(),
            dest_name,
        }
    }

    /// Backup, hidden and destination entries are ignored unless they are
    /// `_posts` or `_layouts`
    pub fn is_ignored(&self, name: &str, path: &Path) -> bool {
        !is_special(name) && (is_backup(name) || is_hidden(name) || self.is_destination(name, path))
    }

    fn is_destination(&self, name: &str, path: &Path) -> bool {
        // A configured name like `public` is excluded at any depth
        path == self.dest_root || name == self.dest_name
    }

    fn is_ignored_entry(&self, entry: &DirEntry) -> bool {
        self.is_ignored(&entry.file_name().to_string_lossy(), entry.path())
    }
}

pub fn is_special(name: &str) -> bool {
    name == POSTS_DIR || name == LAYOUTS_DIR
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

pub fn is_backup(name: &str) -> bool {
    name.ends_with('~')
}

/// A file is a page when its first three bytes open a front-matter block
pub fn is_page(path: &Path) -> Result<bool> {
    let mut head = Vec::with_capacity(DELIMITER.len());
    File::open(path)
        .and_then(|file| file.take(DELIMITER.len() as u64).read_to_end(&mut head))
        .map_err(|source| Error::Scan {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(head == DELIMITER.as_bytes())
}

impl Site {
    /// Classify everything under the source directory
    pub fn scan(&mut self) -> Result<()> {
        let source = self.source.clone();
        self.scan_dir(&source, ScanMode::Normal)
    }

    /// Classify everything under `dir`, starting in `mode`. A `dir` that is
    /// not a directory is skipped.
    pub fn scan_dir(&mut self, dir: &Path, mode: ScanMode) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        let root_mode = mode.enter(&file_name_of(dir));
        let filter = EntryFilter::new(&self.dest, &self.config.destination);
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !filter.is_ignored_entry(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                Error::Scan {
                    path,
                    source: e.into(),
                }
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let mode = mode_below(root_mode, dir, entry.path());
            self.classify(entry.path(), mode)?;
        }

        Ok(())
    }

    /// Route a single file to its collection. The order of the checks
    /// matters: a front-matter file in `_posts` with an invalid post name
    /// becomes a page.
    fn classify(&mut self, path: &Path, mode: ScanMode) -> Result<()> {
        if mode == ScanMode::Layouts {
            let layout = Layout::load(path)?;
            tracing::debug!("Layout '{}': {:?}", layout.name(), path);
            if let Some(previous) = self.layouts.insert(layout.name().to_string(), layout) {
                tracing::debug!("Layout {:?} replaced by {:?}", previous.path(), path);
            }
        } else if mode == ScanMode::Posts && Post::is_valid(path) {
            let post = Post::load(&self.source, path, self.config.permalink)?;
            tracing::debug!("Post: {:?}", path);
            self.posts.push(post);
        } else if is_page(path)? {
            tracing::debug!("Page: {:?}", path);
            self.pages.push(Page::load(&self.source, path)?);
        } else {
            self.static_files.push(path.to_path_buf());
        }
        Ok(())
    }
}

/// Mode of the directory holding `file`, following every directory between
/// `root` and it
fn mode_below(root_mode: ScanMode, root: &Path, file: &Path) -> ScanMode {
    let Some(relative) = file.parent().and_then(|p| p.strip_prefix(root).ok()) else {
        return root_mode;
    };
    relative
        .components()
        .fold(root_mode, |mode, component| match component {
            Component::Normal(name) => mode.enter(&name.to_string_lossy()),
            _ => mode,
        })
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
