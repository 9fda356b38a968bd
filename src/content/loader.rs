//! Content loader - loads blog posts from the content directory

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, FrontMatter, MarkdownRenderer, Post, PostIndex, PostSummary};
use crate::Folio;

/// Loads posts from a flat directory of markdown files
pub struct ContentLoader {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for the site's configured content directory
    pub fn new(folio: &Folio) -> Self {
        Self::with_renderer(
            &folio.content_dir,
            MarkdownRenderer::from_config(&folio.config),
        )
    }

    /// Create a loader for an arbitrary directory
    pub fn with_renderer<P: AsRef<Path>>(content_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            renderer,
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Summaries of all posts, in directory enumeration order
    ///
    /// Bodies are not rendered. Files with a malformed front-matter block are
    /// skipped with a warning.
    pub fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
        Ok(self.index()?.into_vec())
    }

    /// All post summaries keyed by slug
    ///
    /// When several files claim one slug, `{slug}.md` wins if it exists and
    /// keeps that slug; otherwise the first file enumerated wins.
    pub fn index(&self) -> Result<PostIndex, ContentError> {
        let mut loaded = Vec::new();

        for path in self.markdown_files()? {
            match self.load_summary(&path) {
                Ok(summary) if !is_safe_slug(&summary.slug) => {
                    tracing::warn!("Skipping post {:?}: unusable slug {:?}", path, summary.slug)
                }
                Ok(summary) => loaded.push((file_stem(&path), summary)),
                Err(e) => tracing::warn!("Skipping post {:?}: {}", path, e),
            }
        }

        let owned: HashSet<&str> = loaded
            .iter()
            .filter(|(stem, summary)| *stem == summary.slug)
            .map(|(stem, _)| stem.as_str())
            .collect();

        let mut summaries = Vec::with_capacity(loaded.len());
        for (stem, summary) in &loaded {
            if *stem != summary.slug && owned.contains(summary.slug.as_str()) {
                tracing::warn!(
                    "{}.md declares slug {:?}, which belongs to {}.md",
                    stem,
                    summary.slug,
                    summary.slug
                );
                continue;
            }
            summaries.push(summary.clone());
        }

        tracing::debug!(
            "Found {} posts in {:?}",
            summaries.len(),
            self.content_dir
        );
        Ok(PostIndex::build(summaries))
    }

    /// A single post with its body rendered to HTML
    ///
    /// `Ok(None)` means no post has that slug.
    pub fn get_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_safe_slug(slug) {
            tracing::debug!("Rejecting slug {:?}", slug);
            return Ok(None);
        }
        if !self.content_dir.is_dir() {
            return Err(ContentError::NotFound(self.content_dir.clone()));
        }

        // Direct file name match first
        let direct = self.content_dir.join(format!("{}.md", slug));
        let mut direct_error = None;
        if direct.is_file() {
            match self.load_post(&direct) {
                Ok(post) if post.slug() == slug => return Ok(Some(post)),
                Ok(post) => tracing::debug!("{:?} declares slug {:?}", direct, post.slug()),
                // The listing skips this file, another one may own the slug
                Err(e) => direct_error = Some(e),
            }
        }

        match self.find_declared_slug(slug)? {
            Some(path) => self.load_post(&path).map(Some),
            None => match direct_error {
                Some(e) => Err(e),
                None => Ok(None),
            },
        }
    }

    /// File of the first post, in listing order, whose slug is `slug`
    fn find_declared_slug(&self, slug: &str) -> Result<Option<PathBuf>, ContentError> {
        for path in self.markdown_files()? {
            if let Ok(summary) = self.load_summary(&path) {
                if summary.slug == slug {
                    return Ok(Some(path));
                }
            }
        }
        Ok(None)
    }

    fn load_summary(&self, path: &Path) -> Result<PostSummary, ContentError> {
        let content = fs::read_to_string(path)?;
        let (fm, _) = FrontMatter::parse(&content).map_err(|e| ContentError::parse(path, e))?;
        Ok(PostSummary::from_front_matter(&fm, &file_stem(path)))
    }

    fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let content = fs::read_to_string(path)?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| ContentError::parse(path, e))?;

        let summary = PostSummary::from_front_matter(&fm, &file_stem(path));
        let html = self.renderer.render(body);

        Ok(Post {
            summary,
            body: body.to_string(),
            content: html,
        })
    }

    /// Markdown files directly inside the content directory
    fn markdown_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        if !self.content_dir.is_dir() {
            return Err(ContentError::NotFound(self.content_dir.clone()));
        }

        let files = WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file() && is_markdown_file(path))
            .collect();

        Ok(files)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Slugs come from URLs; keep them inside the content directory
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
        && !slug.contains("..")
}
