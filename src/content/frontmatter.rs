//! Front-matter parsing

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

/// Opening and closing line of a front-matter block
pub const DELIMITER: &str = "---";

/// Front-matter parsing errors
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing closing `---`")]
    MissingEndFence,

    #[error("front matter must be a mapping")]
    NotAMapping,

    #[error("unsupported front matter key: {0:?}")]
    UnsupportedKey(Value),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Front-matter data from a layout, page or post.
///
/// Keys keep the order they were written in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter(IndexMap<String, Value>);

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content that does not open with a `---` line has no front matter and
    /// is returned whole.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let Some(rest) = strip_opening_fence(content) else {
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::MissingEndFence)
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let mapping = match serde_yaml::from_str::<Value>(yaml)? {
            Value::Null => return Ok(FrontMatter::default()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(FrontMatterError::NotAMapping),
        };

        let mut data = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = match key {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => return Err(FrontMatterError::UnsupportedKey(other)),
            };
            data.insert(key, value);
        }

        Ok(FrontMatter(data))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get a list of strings. A single string is split on whitespace, a
    /// sequence yields each scalar item.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Name of the layout this file asks to be wrapped in
    pub fn layout(&self) -> Option<&str> {
        self.get_str("layout")
    }

    /// Anything other than an explicit `published: false` is published
    pub fn published(&self) -> bool {
        !matches!(self.0.get("published"), Some(Value::Bool(false)))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Convert to a JSON object for template payloads
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

fn strip_opening_fence(content: &str) -> Option<&str> {
    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    (first.trim_end() == DELIMITER).then_some(rest)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
