//! Content module - blog posts, front-matter and markdown rendering

mod error;
pub mod filter;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use filter::PostFilter;
pub use frontmatter::{FieldValue, FrontMatter, FrontMatterError};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostIndex, PostSummary};
