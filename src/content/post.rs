//! Post models

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FrontMatter;

/// Listing view of a blog post, built from front-matter alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Post title
    pub title: String,

    /// Short description shown in listings
    pub excerpt: String,

    /// Display date, kept as written
    pub date: String,

    /// Display reading time, e.g. "5 min"
    pub read_time: String,

    /// Tags in the order they were written, without duplicates
    pub tags: Vec<String>,

    /// Unique identifier used in URLs
    pub slug: String,
}

impl PostSummary {
    /// Build a summary from front-matter, falling back to `file_stem` for the slug
    pub fn from_front_matter(fm: &FrontMatter, file_stem: &str) -> Self {
        let field = |keys: &[&str]| fm.str_any(keys).unwrap_or_default().to_string();

        let mut tags: Vec<String> = Vec::new();
        for tag in fm.list("tags") {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let slug = fm
            .str("slug")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(file_stem)
            .to_string();

        Self {
            title: field(&["title"]),
            excerpt: field(&["excerpt"]),
            date: field(&["date"]),
            read_time: field(&["readTime", "read_time"]),
            tags,
            slug,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A full blog post, as shown on its own page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,

    /// Raw markdown body
    pub body: String,

    /// Rendered HTML body
    pub content: String,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.summary.slug
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }
}

/// Post summaries keyed by slug, in listing order
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: IndexMap<String, PostSummary>,
}

impl PostIndex {
    /// Index `summaries`; the first summary claiming a slug wins
    pub fn build(summaries: Vec<PostSummary>) -> Self {
        let mut posts = IndexMap::with_capacity(summaries.len());
        for summary in summaries {
            if posts.contains_key(&summary.slug) {
                tracing::warn!("Duplicate slug {:?}, keeping the first post", summary.slug);
                continue;
            }
            posts.insert(summary.slug.clone(), summary);
        }
        Self { posts }
    }

    pub fn get(&self, slug: &str) -> Option<&PostSummary> {
        self.posts.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.posts.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostSummary> {
        self.posts.values()
    }

    pub fn into_vec(self) -> Vec<PostSummary> {
        self.posts.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(slug: &str, title: &str) -> PostSummary {
        PostSummary {
            title: title.to_string(),
            excerpt: String::new(),
            date: String::new(),
            read_time: String::new(),
            tags: Vec::new(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_summary_from_front_matter() {
        let (fm, _) = FrontMatter::parse(
            "---\ntitle: KNUST Expresso\ndate: Jan 2, 2025\nreadTime: 3 min\ntags: [Web, NLP, Web]\n---\n",
        )
        .unwrap();

        let s = PostSummary::from_front_matter(&fm, "knust-expresso");
        assert_eq!(s.title, "KNUST Expresso");
        assert_eq!(s.excerpt, "");
        assert_eq!(s.date, "Jan 2, 2025");
        assert_eq!(s.read_time, "3 min");
        assert_eq!(s.tags, vec!["Web", "NLP"]);
        assert_eq!(s.slug, "knust-expresso");
        assert!(s.has_tag("NLP"));
        assert!(!s.has_tag("nlp"));
    }

    #[test]
    fn test_slug_from_metadata() {
        let (fm, _) = FrontMatter::parse("---\ntitle: T\nslug: custom-slug\n---\n").unwrap();
        let s = PostSummary::from_front_matter(&fm, "file-name");
        assert_eq!(s.slug, "custom-slug");

        let (fm, _) = FrontMatter::parse("---\ntitle: T\nslug: \"  \"\n---\n").unwrap();
        let s = PostSummary::from_front_matter(&fm, "file-name");
        assert_eq!(s.slug, "file-name");
    }

    #[test]
    fn test_summary_json_uses_camel_case() {
        let json = serde_json::to_value(summary("a", "A")).unwrap();
        assert!(json.get("readTime").is_some());
        assert!(json.get("read_time").is_none());
    }

    #[test]
    fn test_index_keeps_first_duplicate() {
        let index = PostIndex::build(vec![
            summary("a", "First"),
            summary("b", "Second"),
            summary("a", "Shadowed"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a").unwrap().title, "First");
        let order: Vec<_> = index.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }
}
