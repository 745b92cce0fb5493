//! Error types for the Xiuxian data model.
//!
//! Matching errors (invalid patterns, unknown rule kinds) are defined in
//! `xiuxian-framework`.

use thiserror::Error;

/// Errors that can occur while building [`Content`](crate::Content) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The reference is neither a remote URL nor an inline base64 blob.
    #[error("unsupported media reference: '{0}' (expected http URL, link:// or base64://)")]
    UnsupportedSource(String),
}

/// Result type for content construction.
pub type ContentResult<T> = Result<T, ContentError>;
