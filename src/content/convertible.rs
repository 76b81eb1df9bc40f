//! Behavior shared by everything that owns front matter and a body:
//! conversion by extension and rendering through a chain of layouts.

use indexmap::IndexSet;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{ConverterRegistry, FrontMatter, Layout};
use crate::templates::{deep_merge, Payload, TemplateEngine};
use crate::{Error, Result};

/// A file with front matter and a convertible body
pub trait Convertible {
    fn front_matter(&self) -> &FrontMatter;

    fn body(&self) -> &str;

    /// Source file extension including the dot, or empty
    fn extension(&self) -> &str;

    /// Convert the body with the converter registered for its extension
    fn convert(&self, converters: &ConverterRegistry) -> Result<String> {
        converters.convert(self.body(), self.extension())
    }

    /// Convert the body and wrap it in its layout chain
    fn render_layout_chain(&self, payload: &Payload, renderer: &Renderer<'_>) -> Result<String> {
        let content = self.convert(renderer.converters)?;
        renderer.apply_layouts(content, self.front_matter().layout(), payload)
    }
}

/// Everything a render call reads. Shared read-only across a whole build.
pub struct Renderer<'a> {
    pub layouts: &'a HashMap<String, Layout>,
    pub converters: &'a ConverterRegistry,
    pub engine: &'a dyn TemplateEngine,
    /// Fail on a layout name with no matching layout instead of ending the
    /// chain there
    pub strict_layouts: bool,
}

impl<'a> Renderer<'a> {
    /// Wrap converted content in `layout` and each parent it declares.
    ///
    /// Every level sees `payload` merged with `content` (the output so far)
    /// and `layout` (that layout's own front matter).
    pub fn apply_layouts(
        &self,
        content: String,
        layout: Option<&str>,
        payload: &Payload,
    ) -> Result<String> {
        let mut output = content;
        let mut visited: IndexSet<String> = IndexSet::new();
        let mut next = layout.map(str::to_string);

        while let Some(name) = next {
            let Some(layout) = self.layouts.get(&name) else {
                if self.strict_layouts {
                    return Err(Error::UnknownLayout { name });
                }
                tracing::warn!("Layout '{}' not found, ending layout chain", name);
                break;
            };

            if !visited.insert(name.clone()) {
                let mut chain: Vec<String> = visited.into_iter().collect();
                chain.push(name);
                return Err(Error::LayoutCycle { chain });
            }

            let mut merged = payload.clone();
            let mut level = Payload::new();
            level.insert("content".to_string(), Value::String(output));
            level.insert("layout".to_string(), layout.front_matter().to_json()?);
            deep_merge(&mut merged, level);

            let rendered = self
                .engine
                .render_string(layout.body(), &merged)
                .map_err(|e| Error::Template {
                    layout: name.clone(),
                    message: format!("{:#}", e),
                })?;
            output = self.converters.convert(&rendered, layout.extension())?;

            next = layout.front_matter().layout().map(str::to_string);
        }

        Ok(output)
    }
}

/// Read a source file during scanning
pub(crate) fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Scan {
        path: path.to_path_buf(),
        source,
    })
}

/// Split source content into front matter and body
pub(crate) fn parse_source(path: &Path, content: &str) -> Result<(FrontMatter, String)> {
    let (front_matter, body) = FrontMatter::parse(content).map_err(|source| Error::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((front_matter, body.to_string()))
}

/// File extension with its leading dot, or an empty string
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every template it renders and substitutes `CONTENT` with
    /// the payload content
    #[derive(Default)]
    struct RecordingEngine {
        calls: RefCell<Vec<String>>,
    }

    impl TemplateEngine for RecordingEngine {
        fn render_string(&self, template: &str, payload: &Payload) -> anyhow::Result<String> {
            self.calls.borrow_mut().push(template.to_string());
            let content = payload.get("content").and_then(Value::as_str).unwrap_or("");
            Ok(template.replace("CONTENT", content))
        }
    }

    struct Snippet {
        front_matter: FrontMatter,
        body: String,
        extension: String,
    }

    impl Convertible for Snippet {
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

    fn snippet(source: &str, extension: &str) -> Snippet {
        let (front_matter, body) = FrontMatter::parse(source).unwrap();
        Snippet {
            front_matter,
            body: body.to_string(),
            extension: extension.to_string(),
        }
    }

    fn layouts(defs: &[(&str, &str)]) -> HashMap<String, Layout> {
        defs.iter()
            .map(|(name, source)| {
                let layout = Layout::from_source(name, ".html", source).unwrap();
                (name.to_string(), layout)
            })
            .collect()
    }

    #[test]
    fn test_no_layout_returns_converted_body() {
        let layouts = HashMap::new();
        let converters = ConverterRegistry::default();
        let engine = RecordingEngine::default();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let page = snippet("---\ntitle: x\n---\n# Hi\n", ".md");
        let output = page.render_layout_chain(&Payload::new(), &renderer).unwrap();

        assert_eq!(output, converters.convert("# Hi\n", ".md").unwrap());
        assert!(engine.calls.borrow().is_empty());
    }

    #[test]
    fn test_two_level_chain_renders_each_layout_once() {
        let layouts = layouts(&[
            ("a", "---\nlayout: b\n---\n<a>CONTENT</a>"),
            ("b", "<b>CONTENT</b>"),
        ]);
        let converters = ConverterRegistry::default();
        let engine = RecordingEngine::default();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let page = snippet("---\nlayout: a\n---\nbody", ".html");
        let output = page.render_layout_chain(&Payload::new(), &renderer).unwrap();

        assert_eq!(output, "<b><a>body</a></b>");
        assert_eq!(
            *engine.calls.borrow(),
            vec!["<a>CONTENT</a>".to_string(), "<b>CONTENT</b>".to_string()]
        );
    }

    #[test]
    fn test_layout_front_matter_is_visible_to_its_template() {
        let layouts = layouts(&[("post", "---\nsection: blog\n---\n{{ layout.section }}|{{ page.title }}|{{ content }}")]);
        let converters = ConverterRegistry::default();
        let engine = crate::templates::TeraEngine::new();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let mut payload = Payload::new();
        payload.insert("page".to_string(), serde_json::json!({"title": "T"}));
        let page = snippet("---\nlayout: post\n---\nhello", ".txt");
        let output = page.render_layout_chain(&payload, &renderer).unwrap();

        assert_eq!(output, "blog|T|hello");
    }

    #[test]
    fn test_unknown_layout_ends_chain() {
        let layouts = layouts(&[("a", "---\nlayout: missing\n---\n[CONTENT]")]);
        let converters = ConverterRegistry::default();
        let engine = RecordingEngine::default();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let page = snippet("---\nlayout: a\n---\nx", ".html");
        assert_eq!(page.render_layout_chain(&Payload::new(), &renderer).unwrap(), "[x]");
    }

    #[test]
    fn test_unknown_layout_is_an_error_when_strict() {
        let layouts = HashMap::new();
        let converters = ConverterRegistry::default();
        let engine = RecordingEngine::default();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: true,
        };

        let page = snippet("---\nlayout: nope\n---\nx", ".html");
        let err = page.render_layout_chain(&Payload::new(), &renderer).unwrap_err();
        assert!(matches!(err, Error::UnknownLayout { name } if name == "nope"));
    }

    #[test]
    fn test_layout_cycle_is_detected() {
        let layouts = layouts(&[
            ("a", "---\nlayout: b\n---\nCONTENT"),
            ("b", "---\nlayout: a\n---\nCONTENT"),
        ]);
        let converters = ConverterRegistry::default();
        let engine = RecordingEngine::default();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let page = snippet("---\nlayout: a\n---\nx", ".html");
        let err = page.render_layout_chain(&Payload::new(), &renderer).unwrap_err();
        match err {
            Error::LayoutCycle { chain } => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_self_referencing_layout_is_a_cycle() {
        let layouts = layouts(&[("a", "---\nlayout: a\n---\nCONTENT")]);
        let converters = ConverterRegistry::default();
        let engine = RecordingEngine::default();
        let renderer = Renderer {
            layouts: &layouts,
            converters: &converters,
            engine: &engine,
            strict_layouts: false,
        };

        let page = snippet("---\nlayout: a\n---\nx", ".html");
        assert!(matches!(
            page.render_layout_chain(&Payload::new(), &renderer),
            Err(Error::LayoutCycle { .. })
        ));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/a/b/post.md")), ".md");
        assert_eq!(extension_of(Path::new("/a/b/archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("/a/b/README")), "");
    }
}
