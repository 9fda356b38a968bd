//! Search and tag filtering over post listings
//!
//! Filtering happens on the caller's side of [`ContentLoader::list_posts`]:
//! the listing page keeps a [`PostFilter`] as its UI state and applies it to
//! the summaries it already has.
//!
//! [`ContentLoader::list_posts`]: super::loader::ContentLoader::list_posts

use serde::{Deserialize, Serialize};

use super::PostSummary;

/// Search text plus at most one active tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilter {
    #[serde(rename = "q")]
    pub query: String,
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Select `tag`; selecting the tag that is already active clears it
    pub fn select_tag(&mut self, tag: &str) {
        if self.tag.as_deref() == Some(tag) {
            self.tag = None;
        } else {
            self.tag = Some(tag.to_string());
        }
    }

    pub fn clear_tag(&mut self) {
        self.tag = None;
    }

    /// Reset both the search text and the tag
    pub fn clear(&mut self) {
        self.query.clear();
        self.tag = None;
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.tag.is_some()
    }

    /// Case-insensitive substring match on title or excerpt
    pub fn matches_search(&self, post: &PostSummary) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let query = self.query.to_lowercase();
        post.title.to_lowercase().contains(&query) || post.excerpt.to_lowercase().contains(&query)
    }

    pub fn matches_tag(&self, post: &PostSummary) -> bool {
        match &self.tag {
            Some(tag) => post.has_tag(tag),
            None => true,
        }
    }

    pub fn matches(&self, post: &PostSummary) -> bool {
        self.matches_search(post) && self.matches_tag(post)
    }

    /// Posts passing the filter, in their original order
    pub fn apply<'a>(&self, posts: &'a [PostSummary]) -> Vec<&'a PostSummary> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }
}

/// Distinct tags across `posts`, in first-seen order
pub fn all_tags(posts: &[PostSummary]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, title: &str, excerpt: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            date: String::new(),
            read_time: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: slug.to_string(),
        }
    }

    fn posts() -> Vec<PostSummary> {
        vec![
            post(
                "ghana-health-qa",
                "Ghana Health Policy QA",
                "Answering questions with a RAG pipeline",
                &["NLP", "RAG"],
            ),
            post("knust-expresso", "KNUST Expresso", "A campus coffee app", &["Web"]),
            post(
                "twi-tokenizer",
                "Tokenizing Twi",
                "Subword units for a low-resource language",
                &["NLP"],
            ),
            post("snippets", "Snippets", "", &[]),
        ]
    }

    fn slugs(posts: Vec<&PostSummary>) -> Vec<&str> {
        posts.into_iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let posts = posts();
        let filter = PostFilter::new();
        assert_eq!(
            slugs(filter.apply(&posts)),
            vec!["ghana-health-qa", "knust-expresso", "twi-tokenizer", "snippets"]
        );
        assert!(!filter.is_active());
    }

    #[test]
    fn test_query_matches_title_or_excerpt_case_insensitively() {
        let posts = posts();
        let filter = PostFilter::new().with_query("RAG");
        assert_eq!(slugs(filter.apply(&posts)), vec!["ghana-health-qa"]);
        assert!(!filter.matches_search(&posts[1]), "KNUST Expresso has no RAG");

        let filter = PostFilter::new().with_query("twi");
        assert_eq!(slugs(filter.apply(&posts)), vec!["twi-tokenizer"]);

        let filter = PostFilter::new().with_query("COFFEE");
        assert_eq!(slugs(filter.apply(&posts)), vec!["knust-expresso"]);
    }

    #[test]
    fn test_selecting_active_tag_clears_it() {
        let posts = posts();
        let mut filter = PostFilter::new();

        filter.select_tag("NLP");
        assert_eq!(
            slugs(filter.apply(&posts)),
            vec!["ghana-health-qa", "twi-tokenizer"]
        );

        filter.select_tag("NLP");
        assert_eq!(filter.tag, None);
        assert_eq!(filter.apply(&posts).len(), posts.len());
    }

    #[test]
    fn test_selecting_another_tag_replaces_it() {
        let mut filter = PostFilter::new();
        filter.select_tag("NLP");
        filter.select_tag("Web");
        assert_eq!(filter.tag.as_deref(), Some("Web"));
    }

    #[test]
    fn test_search_and_tag_combine_with_and() {
        let posts = posts();
        let mut filter = PostFilter::new().with_query("low-resource");
        filter.select_tag("NLP");
        assert_eq!(slugs(filter.apply(&posts)), vec!["twi-tokenizer"]);

        filter.select_tag("Web");
        assert!(filter.apply(&posts).is_empty());

        filter.clear();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&posts).len(), posts.len());
    }

    #[test]
    fn test_all_tags_first_seen_order() {
        assert_eq!(all_tags(&posts()), vec!["NLP", "RAG", "Web"]);
    }

    #[test]
    fn test_filter_from_query_string() {
        let filter: PostFilter = serde_json::from_str(r#"{"q": "rag", "tag": "NLP"}"#).unwrap();
        assert_eq!(filter.query, "rag");
        assert_eq!(filter.tag.as_deref(), Some("NLP"));
    }
}
