//! folio-rs: the engine behind a personal portfolio site
//!
//! This crate loads markdown blog posts with front-matter, filters them for
//! the blog listing, renders them to HTML, and runs the site's scripted chat
//! assistant. Pages are either generated as static files or served by the
//! development server.

pub mod chat;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chat::{Responder, RuleTable, TypingDelay};

/// A portfolio site rooted at a directory
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the blog's markdown files
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// The chat rule table, from `chat.rules_file` or the built-in one
    pub fn rule_table(&self) -> Result<Arc<RuleTable>> {
        let table = match &self.config.chat.rules_file {
            Some(file) => {
                let path = self.base_dir.join(file);
                let table = RuleTable::load(&path)
                    .with_context(|| format!("Failed to load chat rules from {:?}", path))?;
                tracing::debug!("Loaded {} chat rules from {:?}", table.rules().len(), path);
                table
            }
            None => RuleTable::default(),
        };
        Ok(Arc::new(table))
    }

    pub fn responder(&self) -> Result<Responder> {
        Ok(Responder::new(self.rule_table()?))
    }

    pub fn typing_delay(&self) -> TypingDelay {
        TypingDelay::from_config(&self.config.chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.content_dir, dir.path().join("blog-posts"));
        assert_eq!(folio.public_dir, dir.path().join("public"));
        assert_eq!(
            folio.rule_table().unwrap().fallback(),
            RuleTable::default().fallback()
        );
    }

    #[test]
    fn test_custom_rules_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "content_dir: posts\nchat:\n  rules_file: rules.yml\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("rules.yml"),
            "rules:\n  - name: weather\n    reply: Always sunny.\n    keywords: [Weather]\nfallback: Pardon?\n",
        )
        .unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.content_dir, dir.path().join("posts"));

        let responder = folio.responder().unwrap();
        assert_eq!(responder.respond("how is the WEATHER"), "Always sunny.");
        assert_eq!(responder.respond("hello"), "Pardon?");
    }

    #[test]
    fn test_missing_rules_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "chat:\n  rules_file: nope.yml\n",
        )
        .unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(folio.rule_table().is_err());
    }
}
