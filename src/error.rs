//! Typed errors raised by the transformation engine and emitters.
//!
//! Non-matches, hash collisions and unparsable files are not errors; they are
//! handled inside the transform path. Only conditions a caller must act on
//! surface here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The collision chain reached the maximum ID length without finding a
    /// free slot.
    #[error("no free message id left for {text:?} after reaching the maximum id length")]
    IdSpaceExhausted { text: String },

    /// A catalog operation was requested but catalog support is not compiled in.
    #[error("catalog output requires the `catalog` feature; rebuild lingo with `--features catalog`")]
    CatalogUnavailable,

    #[error("invalid transform options: {0}")]
    InvalidOptions(String),
}
