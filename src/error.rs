//! Build error taxonomy
//!
//! Every error names the file it belongs to so the operator can find the
//! offending document. There is no retry path: the build fails and the
//! operator re-runs after fixing the input.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a site build.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed front-matter or an invalid date in a source document.
    #[error("parse error in {file}: {reason}")]
    Parse { file: String, reason: String },

    /// A layout reference could not be resolved or the template failed.
    #[error("render error in {file} (layout '{layout}'): {source}")]
    Render {
        file: String,
        layout: String,
        #[source]
        source: tera::Error,
    },

    /// Unreadable source or unwritable destination.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn parse(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
