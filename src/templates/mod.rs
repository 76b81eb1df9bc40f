//! Template rendering for layouts
//!
//! Layout bodies are Tera templates. Each layout level of a render chain is
//! rendered once with the merged payload as its context.

use anyhow::Result;
use serde_json::{Map, Value};
use tera::{Context, Tera};

/// Data handed to templates: `site`, `page`, `content`, `layout`
pub type Payload = Map<String, Value>;

/// Trait for template engines
pub trait TemplateEngine {
    /// Render a template source with the given payload
    fn render_string(&self, template: &str, payload: &Payload) -> Result<String>;
}

/// Tera-backed template engine
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraEngine;

impl TeraEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for TeraEngine {
    fn render_string(&self, template: &str, payload: &Payload) -> Result<String> {
        let context = Context::from_value(Value::Object(payload.clone()))?;
        // Layouts emit HTML that already went through a converter
        Ok(Tera::one_off(template, &context, false)?)
    }
}

/// Recursively merge `overlay` into `base`. Objects are merged key by key,
/// any other value in `overlay` replaces the one in `base`.
pub fn deep_merge(base: &mut Payload, overlay: Payload) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Build a payload holding a single key
pub fn payload_with(key: &str, value: Value) -> Payload {
    let mut payload = Payload::new();
    payload.insert(key.to_string(), value);
    payload
}
