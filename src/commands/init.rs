//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Default `_config.yml` written by `init`
const CONFIG_TEMPLATE: &str = r#"# Site
title: Grace Aliko
subtitle: Full stack developer & NLP researcher
description: Notes, thoughts, and learning logs on development and NLP research
author: Grace Aliko
language: en

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: blog-posts
public_dir: public

# Writing
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
markdown:
  # Escape raw HTML found in posts instead of passing it through
  escape_html: false

# Blog listing
listing:
  tag_limit: 5

# Chat assistant
chat:
  bot_name: GraceBot
  min_delay_ms: 1000
  max_delay_ms: 2000
  session_idle_secs: 1800
  max_sessions: 100
  # rules_file: chat-rules.yml
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    let posts_dir = target_dir.join("blog-posts");
    fs::create_dir_all(&posts_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let today = chrono::Local::now().format("%B %-d, %Y");
    let sample_post = format!(
        r#"---
title: Hello World
excerpt: The first post on this blog, and a tour of how posts are written.
date: {today}
readTime: 2 min read
tags: [Meta, Writing]
---

Welcome! Every post lives in `blog-posts/` as a markdown file with a small
front-matter block on top.

## Writing a post

```bash
$ folio-rs new "My New Post" --tags NLP,Research
```

## Previewing

```bash
$ folio-rs server
```

The listing is at `/blog/` and the chat assistant at `/chat/`.
"#
    );

    fs::write(posts_dir.join("hello-world.md"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use crate::Folio;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.config.chat.bot_name, "GraceBot");

        let posts = ContentLoader::new(&folio).list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].tags, vec!["Meta", "Writing"]);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
