//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped in a path segment or query value
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/") // -> "/portfolio/blog/" with root "/portfolio/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

/// Page of a single post
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("blog/{}/", encode_url(slug)))
}

/// Blog listing with a search query and an optional tag applied
pub fn listing_url(config: &SiteConfig, query: &str, tag: Option<&str>) -> String {
    let mut params = Vec::new();
    if !query.is_empty() {
        params.push(format!("q={}", encode_url(query)));
    }
    if let Some(tag) = tag {
        params.push(format!("tag={}", encode_url(tag)));
    }

    let base = url_for(config, "blog/");
    if params.is_empty() {
        base
    } else {
        format!("{}?{}", base, params.join("&"))
    }
}

/// Encode a URL component
pub fn encode_url(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &str) -> SiteConfig {
        SiteConfig {
            url: "https://gracealiko.com/".to_string(),
            root: root.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config("/");
        assert_eq!(url_for(&config, "/blog/"), "/blog/");
        assert_eq!(url_for(&config, ""), "/");

        let config = test_config("/site/");
        assert_eq!(url_for(&config, "blog/"), "/site/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config("/");
        assert_eq!(
            full_url_for(&config, "/blog/"),
            "https://gracealiko.com/blog/"
        );
    }

    #[test]
    fn test_listing_url() {
        let config = test_config("/");
        assert_eq!(listing_url(&config, "", None), "/blog/");
        assert_eq!(
            listing_url(&config, "rag pipeline", Some("NLP")),
            "/blog/?q=rag%20pipeline&tag=NLP"
        );
    }

    #[test]
    fn test_post_urls() {
        let config = test_config("/");
        assert_eq!(post_url(&config, "twi"), "/blog/twi/");
        assert_eq!(
            post_url(&config, "ghana-health-qa"),
            "/blog/ghana-health-qa/"
        );
        assert_eq!(
            listing_url(&config, "", Some("Low resource")),
            "/blog/?tag=Low%20resource"
        );
    }
}
