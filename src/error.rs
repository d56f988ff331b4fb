//! Error taxonomy for loading, rendering, and terminal setup

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The file is missing or unreadable
    #[error("error opening file: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but is not a decodable image
    #[error("error decoding file: {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Terminal size or raw mode unavailable
    #[error("could not {action}")]
    TerminalQuery {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    /// Gallery mode found nothing to show (or everything it found went away)
    #[error("no images found in {}", .dir.display())]
    EmptyDirectory { dir: PathBuf },

    #[error("could not read directory {}", .dir.display())]
    DirectoryUnreadable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Scale flags are `-1` through `-9`
    #[error("unsupported scale flag `{0}` (expected -1 through -9)")]
    InvalidScaleFlag(String),

    /// Writing to the output stream failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ViewerError {
    /// True for per-file failures that a caller may skip past
    pub fn is_file_error(&self) -> bool {
        matches!(self, ViewerError::Open { .. } | ViewerError::Decode { .. })
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
