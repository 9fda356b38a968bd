//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub listing: ListingConfig,

    // Chat widget
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Grace Aliko".to_string(),
            subtitle: "Full stack developer & NLP researcher".to_string(),
            description: "Notes, thoughts, and learning logs on development and NLP research"
                .to_string(),
            author: "Grace Aliko".to_string(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "blog-posts".to_string(),
            public_dir: "public".to_string(),

            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),
            listing: ListingConfig::default(),

            chat: ChatConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Markdown conversion settings
///
/// Rendered post bodies are inserted into pages unescaped. Raw HTML inside
/// markdown is trusted unless `escape_html` is set, which must be turned on
/// once posts can come from anyone other than the site author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub escape_html: bool,
}

/// Blog listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// How many tag chips the listing shows while no tag is selected
    pub tag_limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { tag_limit: 5 }
    }
}

/// Chat assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub bot_name: String,
    pub welcome: String,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// YAML rule table replacing the built-in one, relative to the site root
    pub rules_file: Option<String>,
    /// Server chat sessions untouched for this long are dropped
    pub session_idle_secs: u64,
    pub max_sessions: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: "GraceBot".to_string(),
            welcome: "Hi there! I'm GraceBot, Grace's virtual assistant. Ask me anything about \
                      Grace's skills, experience, or projects!"
                .to_string(),
            min_delay_ms: 1000,
            max_delay_ms: 2000,
            rules_file: None,
            session_idle_secs: 30 * 60,
            max_sessions: 100,
        }
    }
}

impl ChatConfig {
    /// Typing delay window, with the bounds swapped back into order if needed
    pub fn delay_window(&self) -> (Duration, Duration) {
        let lo = self.min_delay_ms.min(self.max_delay_ms);
        let hi = self.min_delay_ms.max(self.max_delay_ms);
        (Duration::from_millis(lo), Duration::from_millis(hi))
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "blog-posts");
        assert_eq!(config.listing.tag_limit, 5);
        assert_eq!(config.chat.min_delay_ms, 1000);
        assert_eq!(config.chat.max_delay_ms, 2000);
        assert_eq!(config.chat.session_idle(), Duration::from_secs(1800));
        assert_eq!(config.chat.max_sessions, 100);
        assert!(!config.markdown.escape_html);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
content_dir: posts
chat:
  bot_name: TestBot
  min_delay_ms: 10
markdown:
  escape_html: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.chat.bot_name, "TestBot");
        assert_eq!(config.chat.min_delay_ms, 10);
        assert_eq!(config.chat.max_delay_ms, 2000);
        assert!(config.markdown.escape_html);
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_delay_window_orders_bounds() {
        let chat = ChatConfig {
            min_delay_ms: 900,
            max_delay_ms: 300,
            ..Default::default()
        };
        let (lo, hi) = chat.delay_window();
        assert_eq!(lo, Duration::from_millis(300));
        assert_eq!(hi, Duration::from_millis(900));
    }
}
