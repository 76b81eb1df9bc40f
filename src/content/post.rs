//! Dated posts from `_posts` directories

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

use super::convertible::{extension_of, parse_source, read_source};
use super::{ConverterRegistry, Convertible, FrontMatter, Renderer};
use crate::config::PermalinkStyle;
use crate::site::paths::write_output;
use crate::site::POSTS_DIR;
use crate::templates::{deep_merge, payload_with, Payload};
use crate::{Error, Result};

lazy_static! {
    /// `2009-01-01-hello-world.md` -> date, slug, extension
    static ref MATCHER: Regex = Regex::new(r"^(\d+-\d+-\d+)-(.+)(\.[^.]+)$").unwrap();
}

/// A blog post
#[derive(Debug, Clone)]
pub struct Post {
    source_path: PathBuf,
    date: NaiveDate,
    slug: String,
    extension: String,
    /// Directories between the source root and `_posts`, or the front
    /// matter `category`/`categories`
    categories: Vec<String>,
    /// Directories between `_posts` and the file
    topics: Vec<String>,
    permalink_style: PermalinkStyle,
    front_matter: FrontMatter,
    body: String,
    /// Converted body, before any layout
    content: Option<String>,
    output: Option<String>,
}

impl Post {
    /// Whether a file name looks like a post: `YYYY-MM-DD-slug.ext` with a
    /// real calendar date
    pub fn is_valid(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_file_name)
            .is_some()
    }

    /// Load a post from `path` under `source_root`
    pub fn load(source_root: &Path, path: &Path, permalink_style: PermalinkStyle) -> Result<Self> {
        let (date, slug, extension) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_file_name)
            .ok_or_else(|| Error::InvalidPost {
                path: path.to_path_buf(),
            })?;

        let content = read_source(path)?;
        let (front_matter, body) = parse_source(path, &content)?;
        if let Some(permalink) = front_matter.get_str("permalink") {
            if !is_relative_permalink(permalink) {
                return Err(Error::InvalidPermalink {
                    path: path.to_path_buf(),
                    permalink: permalink.to_string(),
                });
            }
        }

        let (mut categories, topics) = split_post_dirs(path, source_root);
        if categories.is_empty() {
            if let Some(category) = front_matter.get_str("category") {
                categories.push(category.to_string());
            } else {
                categories = front_matter.get_list("categories");
            }
        }

        Ok(Self {
            source_path: path.to_path_buf(),
            date,
            slug,
            extension,
            categories,
            topics,
            permalink_style,
            front_matter,
            body,
            content: None,
            output: None,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn published(&self) -> bool {
        self.front_matter.published()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Front matter `title`, or the slug with each word capitalized
    pub fn title(&self) -> String {
        match self.front_matter.get_str("title") {
            Some(title) => title.to_string(),
            None => self
                .slug
                .split('-')
                .filter(|w| !w.is_empty())
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Directory part of the URL: categories, then the date unless the
    /// permalink style leaves it out
    fn dir(&self) -> String {
        let mut dir = String::new();
        for category in &self.categories {
            dir.push('/');
            dir.push_str(category);
        }
        if self.permalink_style != PermalinkStyle::Plain {
            dir.push_str(&self.date.format("/%Y/%m/%d").to_string());
        }
        dir.push('/');
        dir
    }

    /// Unique identifier: URL directory plus slug
    pub fn id(&self) -> String {
        format!("{}{}", self.dir(), self.slug)
    }

    /// Site-relative URL. A front matter `permalink` wins.
    pub fn url(&self) -> String {
        if let Some(permalink) = self.front_matter.get_str("permalink") {
            return permalink.to_string();
        }
        match self.permalink_style {
            PermalinkStyle::Pretty => format!("{}/", self.id()),
            PermalinkStyle::Date | PermalinkStyle::Plain => format!("{}.html", self.id()),
        }
    }

    /// Output path under `dest_root`. URLs without a file extension are
    /// written as `index.html` inside that directory.
    pub fn destination(&self, dest_root: &Path) -> PathBuf {
        let url = self.url();
        // Only plain components, so the result stays under `dest_root`
        let relative: PathBuf = Path::new(&url)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        let path = dest_root.join(&relative);
        if url.ends_with('/') || relative.extension().is_none() {
            path.join("index.html")
        } else {
            path
        }
    }

    /// Convert the body once so the site payload and the render share it
    pub fn transform(&mut self, converters: &ConverterRegistry) -> Result<()> {
        self.content = Some(self.convert(converters)?);
        Ok(())
    }

    /// Converted body, if `transform` has run
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Template data for this post. Front matter keys override the computed
    /// ones.
    pub fn to_value(&self) -> Result<Value> {
        let mut value = json!({
            "title": self.title(),
            "url": self.url(),
            "date": self.date.format("%Y-%m-%d").to_string(),
            "id": self.id(),
            "slug": self.slug,
            "categories": self.categories,
            "topics": self.topics,
            "content": self.content.as_deref().unwrap_or(&self.body),
        });
        if let (Some(data), Value::Object(front_matter)) =
            (value.as_object_mut(), self.front_matter.to_json()?)
        {
            deep_merge(data, front_matter);
        }
        Ok(value)
    }

    /// Render with `{page: post data}` merged over the site payload
    pub fn render(&mut self, site_payload: &Payload, renderer: &Renderer<'_>) -> Result<()> {
        if self.content.is_none() {
            self.transform(renderer.converters)?;
        }

        let mut payload = site_payload.clone();
        deep_merge(&mut payload, payload_with("page", self.to_value()?));

        let content = self.content.clone().unwrap_or_default();
        self.output = Some(renderer.apply_layouts(content, self.front_matter.layout(), &payload)?);
        Ok(())
    }

    /// Write the rendered output
    pub fn write(&self, dest_root: &Path) -> Result<PathBuf> {
        let path = self.destination(dest_root);
        write_output(&path, self.output.as_deref().unwrap_or_default())?;
        tracing::debug!("Wrote post: {:?}", path);
        Ok(path)
    }
}

impl Convertible for Post {
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

/// Posts order by date, then slug, then source path
impl Ord for Post {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.slug.cmp(&other.slug))
            .then_with(|| self.source_path.cmp(&other.source_path))
    }
}

impl PartialOrd for Post {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Post {}

fn parse_file_name(name: &str) -> Option<(NaiveDate, String, String)> {
    let caps = MATCHER.captures(name)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    Some((date, caps[2].to_string(), caps[3].to_string()))
}

/// Split the directories around the nearest `_posts` into categories (above)
/// and topics (below)
fn split_post_dirs(path: &Path, source_root: &Path) -> (Vec<String>, Vec<String>) {
    let Some(relative) = path
        .parent()
        .and_then(|parent| parent.strip_prefix(source_root).ok())
    else {
        return (Vec::new(), Vec::new());
    };

    let dirs: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    match dirs.iter().rposition(|d| d == POSTS_DIR) {
        Some(pos) => (dirs[..pos].to_vec(), dirs[pos + 1..].to_vec()),
        None => (Vec::new(), Vec::new()),
    }
}

/// A permalink may only name paths inside the destination: no `..` and no
/// drive or UNC prefix
fn is_relative_permalink(permalink: &str) -> bool {
    Path::new(permalink).components().all(|c| {
        matches!(
            c,
            Component::RootDir | Component::CurDir | Component::Normal(_)
        )
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
