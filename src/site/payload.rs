//! The `site` variable every template sees

use chrono::{DateTime, TimeZone};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::Site;
use crate::content::Post;
use crate::templates::Payload;
use crate::Result;

/// Group `items` under every key `keys` returns for them, each group in
/// descending order. An item listing the same key twice appears once.
pub fn group_and_sort_by_key<'a, T, I, F>(items: I, keys: F) -> BTreeMap<String, Vec<&'a T>>
where
    T: Ord + 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a [String],
{
    let mut groups: BTreeMap<String, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        for key in keys(item) {
            let group = groups.entry(key.clone()).or_default();
            if !group.last().is_some_and(|last| std::ptr::eq(*last, item)) {
                group.push(item);
            }
        }
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| b.cmp(a));
    }
    groups
}

impl Site {
    /// Build `{site: {time, posts, categories, topics}}` from the published
    /// posts. Posts are newest first everywhere.
    pub fn site_payload<Tz>(&self, time: DateTime<Tz>) -> Result<Payload>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut posts: Vec<&Post> = self.published_posts().collect();
        posts.sort_by(|a, b| b.cmp(a));
        let posts = posts
            .into_iter()
            .map(Post::to_value)
            .collect::<Result<Vec<_>>>()?;

        let categories =
            grouped_values(group_and_sort_by_key(self.published_posts(), Post::categories))?;
        let topics = grouped_values(group_and_sort_by_key(self.published_posts(), Post::topics))?;

        let mut payload = Payload::new();
        payload.insert(
            "site".to_string(),
            json!({
                "time": time.to_rfc3339(),
                "posts": posts,
                "categories": categories,
                "topics": topics,
            }),
        );
        Ok(payload)
    }
}

fn grouped_values(groups: BTreeMap<String, Vec<&Post>>) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for (key, posts) in groups {
        let values = posts
            .into_iter()
            .map(Post::to_value)
            .collect::<Result<Vec<_>>>()?;
        map.insert(key, Value::Array(values));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::{FixedOffset, Utc};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanned(src: &Path) -> Site {
        let mut site = Site::new(SiteConfig::default(), src, &src.join("_site"));
        site.scan().unwrap();
        site
    }

    fn titles(values: &Value) -> Vec<&str> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["title"].as_str().unwrap())
            .collect()
    }

    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct Tagged {
        rank: u32,
        tags: Vec<String>,
    }

    fn tagged(rank: u32, tags: &[&str]) -> Tagged {
        Tagged {
            rank,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_group_and_sort_by_key() {
        let items = vec![tagged(1, &["x"]), tagged(2, &["x", "y"])];
        let groups = group_and_sort_by_key(&items, |t| t.tags.as_slice());

        let ranks = |key: &str| groups[key].iter().map(|t| t.rank).collect::<Vec<_>>();
        assert_eq!(groups.len(), 2);
        assert_eq!(ranks("x"), vec![2, 1]);
        assert_eq!(ranks("y"), vec![2]);
    }

    #[test]
    fn test_group_repeated_key_once() {
        let items = vec![tagged(1, &["x", "x"])];
        let groups = group_and_sort_by_key(&items, |t| t.tags.as_slice());
        assert_eq!(groups["x"].len(), 1);
    }

    #[test]
    fn test_group_empty() {
        let items: Vec<Tagged> = Vec::new();
        assert!(group_and_sort_by_key(&items, |t| t.tags.as_slice()).is_empty());
    }

    #[test]
    fn test_site_payload_groups_posts() {
        let src = TempDir::new().unwrap();
        write(
            src.path(),
            "_posts/2009-01-01-p1.md",
            "---\ntitle: P1\ncategories: x\n---\n",
        );
        write(
            src.path(),
            "_posts/2009-06-01-p2.md",
            "---\ntitle: P2\ncategories: [x, y]\n---\n",
        );

        let site = scanned(src.path());
        let payload = site.site_payload(Utc::now()).unwrap();
        let data = &payload["site"];

        assert_eq!(titles(&data["posts"]), vec!["P2", "P1"]);
        assert_eq!(titles(&data["categories"]["x"]), vec!["P2", "P1"]);
        assert_eq!(titles(&data["categories"]["y"]), vec!["P2"]);
        assert_eq!(data["categories"].as_object().unwrap().len(), 2);
        assert!(data["topics"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_site_payload_categories_from_directories() {
        let src = TempDir::new().unwrap();
        write(src.path(), "code/_posts/rust/2010-03-01-borrow.md", "---\ntitle: Borrow\n---\n");
        write(src.path(), "_posts/2010-01-01-intro.md", "---\ntitle: Intro\n---\n");

        let site = scanned(src.path());
        let payload = site.site_payload(Utc::now()).unwrap();
        let data = &payload["site"];

        assert_eq!(titles(&data["categories"]["code"]), vec!["Borrow"]);
        assert_eq!(titles(&data["topics"]["rust"]), vec!["Borrow"]);
        assert_eq!(titles(&data["posts"]), vec!["Borrow", "Intro"]);
    }

    #[test]
    fn test_site_payload_leaves_out_unpublished() {
        let src = TempDir::new().unwrap();
        write(src.path(), "_posts/2009-01-01-a.md", "---\ntitle: A\ncategory: x\n---\n");
        write(
            src.path(),
            "_posts/2009-02-01-b.md",
            "---\ntitle: B\ncategory: y\npublished: false\n---\n",
        );

        let site = scanned(src.path());
        let payload = site.site_payload(Utc::now()).unwrap();
        let data = &payload["site"];

        assert_eq!(titles(&data["posts"]), vec!["A"]);
        assert_eq!(titles(&data["categories"]["x"]), vec!["A"]);
        assert!(data["categories"].get("y").is_none());
    }

    #[test]
    fn test_site_payload_time() {
        let site = Site::new(SiteConfig::default(), Path::new("/nowhere"), Path::new("/out"));
        let time = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2009, 5, 18, 12, 30, 0)
            .unwrap();

        let payload = site.site_payload(time).unwrap();

        assert_eq!(payload["site"]["time"], "2009-05-18T12:30:00+01:00");
        assert!(payload["site"]["posts"].as_array().unwrap().is_empty());
    }
}
