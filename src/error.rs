//! Crate-wide error type.

use crate::slideshow::ViewerId;

/// Errors produced by the slideshow server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The update body was not a valid slide.
    #[error("invalid slide payload: {0}")]
    InvalidSlide(#[from] serde_json::Error),

    /// The viewer's transport has already been closed.
    #[error("viewer {0} is closed")]
    ViewerClosed(ViewerId),

    /// Writing to the viewer's transport failed.
    #[error("send to viewer {id} failed: {reason}")]
    SendFailed { id: ViewerId, reason: String },

    /// An environment setting could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
