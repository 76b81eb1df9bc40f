//! Layout templates loaded from `_layouts`

use std::path::{Path, PathBuf};

use super::convertible::{extension_of, parse_source, read_source};
use super::{Convertible, FrontMatter};
use crate::Result;

/// A named template that wraps rendered content. It may ask to be wrapped
/// in a parent layout through its own `layout` key.
#[derive(Debug, Clone)]
pub struct Layout {
    name: String,
    extension: String,
    path: PathBuf,
    front_matter: FrontMatter,
    body: String,
}

impl Layout {
    /// Load a layout file. `_layouts/default.html` is registered as `default`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_source(path)?;
        let (front_matter, body) = parse_source(path, &content)?;

        Ok(Self {
            name: layout_name(path),
            extension: extension_of(path),
            path: path.to_path_buf(),
            front_matter,
            body,
        })
    }

    /// Build a layout from in-memory source
    pub fn from_source(name: &str, extension: &str, source: &str) -> Result<Self> {
        let path = PathBuf::from(format!("{}{}", name, extension));
        let (front_matter, body) = parse_source(&path, source)?;

        Ok(Self {
            name: name.to_string(),
            extension: extension.to_string(),
            path,
            front_matter,
            body,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent layout declared by this layout
    pub fn parent(&self) -> Option<&str> {
        self.front_matter.layout()
    }
}

impl Convertible for Layout {
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

/// File name with its final extension stripped
fn layout_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
