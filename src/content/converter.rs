//! Extension-keyed content converters

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

use super::MarkdownRenderer;
use crate::config::MarkdownConfig;

/// Extensions handled by the Markdown converter
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mkdn", "mkd", "mdown"];

/// Turns a content body into its output form
pub trait Converter: Send + Sync {
    /// Convert a body
    fn convert(&self, body: &str) -> Result<String>;

    /// Extension of the converted output (e.g. `.html`), if it differs from
    /// the source extension
    fn output_extension(&self) -> Option<&str>;
}

/// Passes content through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityConverter;

impl Converter for IdentityConverter {
    fn convert(&self, body: &str) -> Result<String> {
        Ok(body.to_string())
    }

    fn output_extension(&self) -> Option<&str> {
        None
    }
}

/// Maps file extensions to converters. Unknown extensions use the identity
/// converter.
#[derive(Clone)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn Converter>>,
    fallback: Arc<dyn Converter>,
}

impl ConverterRegistry {
    /// Registry with no converters: everything passes through
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
            fallback: Arc::new(IdentityConverter),
        }
    }

    /// Registry with the Markdown converter configured from the site config
    pub fn from_config(config: &MarkdownConfig) -> Self {
        let mut registry = Self::empty();
        let markdown: Arc<dyn Converter> = Arc::new(MarkdownRenderer::from_config(config));
        for ext in MARKDOWN_EXTENSIONS {
            registry.register_shared(ext, Arc::clone(&markdown));
        }
        registry
    }

    /// Register a converter for an extension (with or without leading dot)
    pub fn register<C: Converter + 'static>(&mut self, extension: &str, converter: C) {
        self.register_shared(extension, Arc::new(converter));
    }

    fn register_shared(&mut self, extension: &str, converter: Arc<dyn Converter>) {
        self.converters.insert(normalize(extension), converter);
    }

    /// Converter for an extension
    pub fn get(&self, extension: &str) -> &dyn Converter {
        self.converters
            .get(&normalize(extension))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Convert a body according to its extension
    pub fn convert(&self, body: &str, extension: &str) -> crate::Result<String> {
        self.get(extension)
            .convert(body)
            .map_err(|e| crate::Error::Convert {
                extension: normalize(extension),
                message: format!("{:#}", e),
            })
    }

    /// Extension of converted output. An empty source extension stays empty.
    pub fn output_extension(&self, extension: &str) -> String {
        if extension.is_empty() {
            return String::new();
        }
        match self.get(extension).output_extension() {
            Some(ext) => ext.to_string(),
            None => extension.to_string(),
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::from_config(&MarkdownConfig::default())
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
