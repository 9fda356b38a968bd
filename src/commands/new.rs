//! Create a new blog post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Front-matter values for a new post
#[derive(Debug, Clone, Default)]
pub struct NewPost<'a> {
    pub title: &'a str,
    /// Defaults to the slugified title
    pub slug: Option<&'a str>,
    pub tags: &'a [String],
    pub read_time: Option<&'a str>,
}

/// Write a new markdown post into the content directory
pub fn create_post(folio: &Folio, post: &NewPost<'_>) -> Result<PathBuf> {
    let slug = match post.slug {
        Some(slug) => slug::slugify(slug),
        None => slug::slugify(post.title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", post.title);
    }

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let tags = post
        .tags
        .iter()
        .map(|t| quote(t.trim()))
        .collect::<Vec<_>>()
        .join(", ");

    let content = format!(
        "---\ntitle: {title}\nexcerpt: \"\"\ndate: {date}\nreadTime: {read_time}\ntags: [{tags}]\n---\n\n",
        title = quote(post.title),
        date = now.format("%B %-d, %Y"),
        read_time = post.read_time.unwrap_or("5 min read"),
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote values the front-matter reader would otherwise split or strip
fn quote(value: &str) -> String {
    if value.contains([',', '#', '[', ']', '"']) || value.starts_with('\'') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
