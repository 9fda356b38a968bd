//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Both the static generator and the
//! development server render pages through [`TemplateRenderer`].

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::filter::all_tags;
use crate::content::{Post, PostFilter, PostSummary};
use crate::helpers::{encode_url, full_url_for, listing_url, post_url, url_for};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("chat.html", include_str!("site/chat.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Blog listing with `filter` applied
    pub fn render_listing(
        &self,
        config: &SiteConfig,
        posts: &[PostSummary],
        filter: &PostFilter,
    ) -> Result<String> {
        let mut context = base_context(config);
        context.insert("listing", &ListingData::build(config, posts, filter));
        self.render("blog_index.html", &context)
    }

    /// A single post page
    pub fn render_post(&self, config: &SiteConfig, post: &Post) -> Result<String> {
        let mut context = base_context(config);
        context.insert("post", &PostData::full(config, post));
        self.render("post.html", &context)
    }

    pub fn render_not_found(&self, config: &SiteConfig) -> Result<String> {
        self.render("not_found.html", &base_context(config))
    }

    pub fn render_chat(&self, config: &SiteConfig) -> Result<String> {
        let mut context = base_context(config);
        context.insert("chat", &config.chat);
        self.render("chat.html", &context)
    }
}

fn base_context(config: &SiteConfig) -> Context {
    let mut context = Context::new();
    context.insert("site", &SiteData::from(config));
    context.insert("version", env!("CARGO_PKG_VERSION"));
    context
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            root: url_for(config, ""),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub read_time: String,
    pub url: String,
    /// Absolute URL, for the canonical link
    pub permalink: String,
    pub tags: Vec<TagLink>,
    /// Rendered body, only set on post pages
    pub content: Option<String>,
}

impl PostData {
    fn card(config: &SiteConfig, post: &PostSummary, filter: &PostFilter) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date: post.date.clone(),
            read_time: post.read_time.clone(),
            url: post_url(config, &post.slug),
            permalink: full_url_for(config, &format!("blog/{}/", encode_url(&post.slug))),
            tags: post
                .tags
                .iter()
                .map(|tag| tag_link(config, filter, tag))
                .collect(),
            content: None,
        }
    }

    fn full(config: &SiteConfig, post: &Post) -> Self {
        Self {
            content: Some(post.content.clone()),
            ..Self::card(config, &post.summary, &PostFilter::default())
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub query: String,
    pub posts: Vec<PostData>,
    /// Tag chips shown while no tag is active
    pub tags: Vec<TagLink>,
    /// The active tag, linking to the listing without it
    pub active_tag: Option<TagLink>,
    /// Whether a search or tag narrows the listing
    pub filtered: bool,
    pub total: usize,
}

impl ListingData {
    pub fn build(config: &SiteConfig, posts: &[PostSummary], filter: &PostFilter) -> Self {
        let visible = filter.apply(posts);

        let tags = all_tags(posts)
            .iter()
            .take(config.listing.tag_limit)
            .map(|tag| tag_link(config, filter, tag))
            .collect();

        let active_tag = filter.tag.as_ref().map(|tag| TagLink {
            name: tag.clone(),
            url: listing_url(config, &filter.query, None),
        });

        Self {
            query: filter.query.clone(),
            posts: visible
                .into_iter()
                .map(|post| PostData::card(config, post, filter))
                .collect(),
            tags,
            active_tag,
            filtered: filter.is_active(),
            total: posts.len(),
        }
    }
}

/// Link that selects `tag` on top of `filter` (or clears it when already active)
fn tag_link(config: &SiteConfig, filter: &PostFilter, tag: &str) -> TagLink {
    let mut next = filter.clone();
    next.select_tag(tag);
    TagLink {
        name: tag.to_string(),
        url: listing_url(config, &next.query, next.tag.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, title: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            title: title.to_string(),
            excerpt: format!("About {}", title),
            date: "May 1, 2025".to_string(),
            read_time: "4 min".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: slug.to_string(),
        }
    }

    fn posts() -> Vec<PostSummary> {
        vec![
            post("a", "Alpha & Omega", &["NLP", "RAG"]),
            post("b", "Beta", &["Web", "A", "B", "C", "D"]),
        ]
    }

    #[test]
    fn test_listing_data_limits_tags() {
        let config = SiteConfig::default();
        let data = ListingData::build(&config, &posts(), &PostFilter::default());
        let names: Vec<_> = data.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["NLP", "RAG", "Web", "A", "B"]);
        assert_eq!(data.posts.len(), 2);
        assert!(data.active_tag.is_none());
    }

    #[test]
    fn test_active_tag_links_toggle_off() {
        let config = SiteConfig::default();
        let mut filter = PostFilter::default();
        filter.select_tag("NLP");

        let data = ListingData::build(&config, &posts(), &filter);
        assert_eq!(data.posts.len(), 1);
        let active = data.active_tag.unwrap();
        assert_eq!(active.url, "/blog/");
        assert_eq!(data.posts[0].tags[0].url, "/blog/");
        assert_eq!(data.posts[0].tags[1].url, "/blog/?tag=RAG");
    }

    #[test]
    fn test_render_listing_escapes_titles() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_listing(&SiteConfig::default(), &posts(), &PostFilter::default())
            .unwrap();
        assert!(html.contains("Alpha &amp; Omega"));
        assert!(html.contains("Filter by:"));
    }

    #[test]
    fn test_render_listing_empty_state() {
        let renderer = TemplateRenderer::new().unwrap();
        let filter = PostFilter::new().with_query("nothing matches this");
        let html = renderer
            .render_listing(&SiteConfig::default(), &posts(), &filter)
            .unwrap();
        assert!(html.contains("No posts found"));
        assert!(html.contains("Clear filters"));
        assert!(html.contains("Showing 0 of 2 posts"));
    }

    #[test]
    fn test_render_post_inserts_html_verbatim() {
        let renderer = TemplateRenderer::new().unwrap();
        let post = Post {
            summary: post("a", "Alpha", &[]),
            body: "## Heading".to_string(),
            content: "<h2>Heading</h2>".to_string(),
        };
        let html = renderer.render_post(&SiteConfig::default(), &post).unwrap();
        assert!(html.contains("<h2>Heading</h2>"));
        assert!(html.contains("May 1, 2025 &bull; 4 min"));
        assert!(html.contains(r#"<link rel="canonical" href="http:"#));
    }

    #[test]
    fn test_render_chat_and_not_found() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        assert!(renderer.render_chat(&config).unwrap().contains("GraceBot"));
        assert!(renderer.render_not_found(&config).unwrap().contains("404"));
    }
}
