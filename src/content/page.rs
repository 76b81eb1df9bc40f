//! Standalone pages: any file with front matter outside `_posts` and
//! `_layouts`

use std::path::{Path, PathBuf};

use super::convertible::{extension_of, parse_source, read_source};
use super::{Convertible, FrontMatter, Renderer};
use crate::site::paths::{compute_destination, relativize, write_output};
use crate::templates::{deep_merge, payload_with, Payload};
use crate::Result;

/// A rendered content file mirrored into the destination tree
#[derive(Debug, Clone)]
pub struct Page {
    source_path: PathBuf,
    /// Directory relative to the source root
    dir: PathBuf,
    name: String,
    extension: String,
    /// Extension of the written file; follows the converter once rendered
    output_extension: String,
    front_matter: FrontMatter,
    body: String,
    output: Option<String>,
}

impl Page {
    /// Load a page from `path` under `source_root`
    pub fn load(source_root: &Path, path: &Path) -> Result<Self> {
        let content = read_source(path)?;
        let (front_matter, body) = parse_source(path, &content)?;
        let (dir, name) = relativize(path, source_root);
        let extension = extension_of(path);

        Ok(Self {
            source_path: path.to_path_buf(),
            dir,
            name,
            output_extension: extension.clone(),
            extension,
            front_matter,
            body,
            output: None,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Directory relative to the source root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Render with `{page: front matter}` merged over the site payload
    pub fn render(&mut self, site_payload: &Payload, renderer: &Renderer<'_>) -> Result<()> {
        let mut payload = site_payload.clone();
        deep_merge(&mut payload, payload_with("page", self.front_matter.to_json()?));

        let output = self.render_layout_chain(&payload, renderer)?;
        self.output_extension = renderer.converters.output_extension(&self.extension);
        self.output = Some(output);
        Ok(())
    }

    /// Output path under `dest_root`
    pub fn destination(&self, dest_root: &Path) -> PathBuf {
        dest_root.join(compute_destination(
            &self.dir,
            &self.name,
            &self.output_extension,
        ))
    }

    /// Write the rendered output. Unrendered pages write an empty file.
    pub fn write(&self, dest_root: &Path) -> Result<PathBuf> {
        let path = self.destination(dest_root);
        write_output(&path, self.output.as_deref().unwrap_or_default())?;
        tracing::debug!("Wrote page: {:?}", path);
        Ok(path)
    }
}

impl Convertible for Page {
    fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ConverterRegistry, Layout};
    use crate::templates::TeraEngine;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_page() {
        let src = TempDir::new().unwrap();
        let path = write(src.path(), "docs/about.md", "---\ntitle: About\n---\nHello\n");

        let page = Page::load(src.path(), &path).unwrap();
        assert_eq!(page.dir(), Path::new("docs"));
        assert_eq!(page.name(), "about.md");
        assert_eq!(page.extension(), ".md");
        assert_eq!(page.front_matter().get_str("title"), Some("About"));
        assert_eq!(page.body(), "Hello\n");
        assert!(page.output().is_none());
    }

    #[test]
    fn test_markdown_page_renders_to_html_file() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let path = write(src.path(), "blog/post.md", "---\nlayout: default\ntitle: Hi\n---\n# Hello\n");

        let mut layouts = HashMap::new();
        layouts.insert(
            "default".to_string(),
            Layout::from_source("default", ".html", "<title>{{ page.title }}</title>{{ content }}").unwrap(),
        );
        let converters = ConverterRegistry::default();
        let engine = TeraEngine::new();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let mut page = Page::load(src.path(), &path).unwrap();
        page.render(&Payload::new(), &renderer).unwrap();
        let written = page.write(dest.path()).unwrap();

        assert_eq!(written, dest.path().join("blog/post.html"));
        let html = fs::read_to_string(written).unwrap();
        assert!(html.starts_with("<title>Hi</title>"));
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_page_without_extension_keeps_its_name() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let path = write(src.path(), "CNAME", "---\n---\nexample.com\n");

        let layouts = HashMap::new();
        let converters = ConverterRegistry::default();
        let engine = TeraEngine::new();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let mut page = Page::load(src.path(), &path).unwrap();
        page.render(&Payload::new(), &renderer).unwrap();
        let written = page.write(dest.path()).unwrap();

        assert_eq!(written, dest.path().join("CNAME"));
        assert_eq!(fs::read_to_string(written).unwrap(), "example.com\n");
    }
}
