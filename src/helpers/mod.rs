//! Helper functions shared by templates, the generator and the server

mod html;
mod url;

pub use html::*;
pub use url::*;
