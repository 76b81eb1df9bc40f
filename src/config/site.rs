//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub source: String,
    pub destination: String,

    // URL
    pub permalink: PermalinkStyle,

    // Rendering
    /// Fail the build when a layout refers to a layout that does not exist
    pub strict_layouts: bool,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            destination: "_site".to_string(),
            permalink: PermalinkStyle::default(),
            strict_layouts: false,
            markdown: MarkdownConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// How post URLs are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermalinkStyle {
    /// `/category/2009/01/01/slug.html`
    #[default]
    Date,
    /// `/category/2009/01/01/slug/index.html`
    Pretty,
    /// `/category/slug.html`
    #[serde(rename = "none")]
    Plain,
}

/// Markdown converter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Syntax highlight fenced code blocks
    pub highlight: bool,
    pub highlight_theme: String,
    pub line_numbers: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
            smart_punctuation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.source, ".");
        assert_eq!(config.destination, "_site");
        assert_eq!(config.permalink, PermalinkStyle::Date);
        assert!(!config.strict_layouts);
        assert!(config.markdown.highlight);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
destination: public
permalink: pretty
strict_layouts: true
markdown:
  line_numbers: true
author: Test User
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source, ".");
        assert_eq!(config.destination, "public");
        assert_eq!(config.permalink, PermalinkStyle::Pretty);
        assert!(config.strict_layouts);
        assert!(config.markdown.line_numbers);
        assert!(config.markdown.highlight);
        assert_eq!(
            config.extra.get("author").and_then(|v| v.as_str()),
            Some("Test User")
        );
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.destination, "_site");
    }
}
