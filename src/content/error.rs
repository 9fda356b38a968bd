//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    /// The configured content directory does not exist
    #[error("content directory not found: {0}")]
    NotFound(PathBuf),

    /// The front-matter block of a file is malformed
    #[error("invalid front-matter in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
