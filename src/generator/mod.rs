//! Generator module - renders the blog into static HTML files

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{ContentError, ContentLoader, PostFilter, PostSummary};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Static site generator using the built-in templates
pub struct Generator {
    folio: Folio,
    loader: ContentLoader,
    renderer: TemplateRenderer,
}

/// What a generation pass wrote
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub posts: usize,
    pub files: Vec<PathBuf>,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            loader: ContentLoader::new(folio),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<GenerateReport> {
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)?;

        let posts = match self.loader.list_posts() {
            Ok(posts) => posts,
            Err(ContentError::NotFound(dir)) => {
                tracing::warn!("Content directory {:?} not found, generating an empty blog", dir);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut report = GenerateReport {
            posts: posts.len(),
            files: Vec::new(),
        };

        self.generate_listing(&posts, &mut report)?;
        self.generate_post_pages(&posts, &mut report)?;
        self.generate_search_index(&posts, &mut report)?;
        self.generate_extra_pages(&mut report)?;

        Ok(report)
    }

    /// Generate the unfiltered blog listing
    fn generate_listing(&self, posts: &[PostSummary], report: &mut GenerateReport) -> Result<()> {
        let html =
            self.renderer
                .render_listing(&self.folio.config, posts, &PostFilter::default())?;
        self.write("blog/index.html", &html, report)
    }

    /// Generate one page per post
    fn generate_post_pages(&self, posts: &[PostSummary], report: &mut GenerateReport) -> Result<()> {
        for summary in posts {
            let post = match self.loader.get_post(&summary.slug) {
                Ok(Some(post)) => post,
                Ok(None) => {
                    tracing::warn!("Post {:?} disappeared during generation", summary.slug);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", summary.slug, e);
                    continue;
                }
            };

            let html = self
                .renderer
                .render_post(&self.folio.config, &post)
                .with_context(|| format!("Failed to render post {:?}", summary.slug))?;
            self.write(&format!("blog/{}/index.html", post.slug()), &html, report)?;
            tracing::debug!("Generated post: {}", post.slug());
        }
        Ok(())
    }

    /// Post summaries for client-side search
    fn generate_search_index(&self, posts: &[PostSummary], report: &mut GenerateReport) -> Result<()> {
        let json = serde_json::to_string_pretty(posts)?;
        self.write("api/posts.json", &json, report)
    }

    fn generate_extra_pages(&self, report: &mut GenerateReport) -> Result<()> {
        let config = &self.folio.config;
        let not_found = self.renderer.render_not_found(config)?;
        self.write("404.html", &not_found, report)?;
        let chat = self.renderer.render_chat(config)?;
        self.write("chat/index.html", &chat, report)
    }

    fn write(&self, relative: &str, content: &str, report: &mut GenerateReport) -> Result<()> {
        let output_path = self.folio.public_dir.join(relative);
        write_file(&output_path, content)?;
        report.files.push(output_path);
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}
