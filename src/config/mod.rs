//! Configuration module

mod site;

pub use site::ChatConfig;
pub use site::HighlightConfig;
pub use site::ListingConfig;
pub use site::MarkdownConfig;
pub use site::SiteConfig;
