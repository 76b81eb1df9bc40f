//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::Post;
use crate::site::{group_and_sort_by_key, Site};
use crate::Jekyll;

/// Scan the site and print what it holds of one kind
pub fn run(jekyll: &Jekyll, content_type: &str) -> Result<()> {
    let mut site = jekyll.site();
    site.scan()?;
    print!("{}", render(&site, content_type)?);
    Ok(())
}

fn render(site: &Site, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let mut posts: Vec<&Post> = site.posts.iter().collect();
            posts.sort_by(|a, b| b.cmp(a));
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(
                    out,
                    "  {} - {} [{}]{}",
                    post.date().format("%Y-%m-%d"),
                    post.title(),
                    post.url(),
                    if post.published() { "" } else { " (unpublished)" }
                )?;
            }
        }
        "page" | "pages" => {
            writeln!(out, "Pages ({}):", site.pages.len())?;
            for page in &site.pages {
                writeln!(out, "  {}", page.dir().join(page.name()).display())?;
            }
        }
        "layout" | "layouts" => {
            let mut names: Vec<&String> = site.layouts.keys().collect();
            names.sort();
            writeln!(out, "Layouts ({}):", names.len())?;
            for name in names {
                let layout = &site.layouts[name];
                match layout.parent() {
                    Some(parent) => writeln!(out, "  {} -> {}", name, parent)?,
                    None => writeln!(out, "  {}", name)?,
                }
            }
        }
        "file" | "files" => {
            writeln!(out, "Static files ({}):", site.static_files.len())?;
            for file in &site.static_files {
                let relative = file.strip_prefix(site.source()).unwrap_or(file);
                writeln!(out, "  {}", relative.display())?;
            }
        }
        "category" | "categories" => {
            let groups = group_and_sort_by_key(site.published_posts(), Post::categories);
            writeln!(out, "Categories ({}):", groups.len())?;
            for (category, posts) in groups {
                writeln!(out, "  {} ({})", category, posts.len())?;
            }
        }
        "topic" | "topics" => {
            let groups = group_and_sort_by_key(site.published_posts(), Post::topics);
            writeln!(out, "Topics ({}):", groups.len())?;
            for (topic, posts) in groups {
                writeln!(out, "  {} ({})", topic, posts.len())?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, pages, layouts, files, categories, topics",
                content_type
            );
        }
    }

    Ok(out)
}
