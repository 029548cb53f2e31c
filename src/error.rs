//! Error types for exact geometric operations.

use thiserror::Error;

/// Errors that can occur while building or executing a clipping operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    /// A coordinate lies outside the representable range.
    #[error("coordinate outside allowed range")]
    CoordinateOutOfRange,

    /// A path has too few distinct vertices for the requested operation.
    #[error("degenerate path: too few distinct vertices")]
    DegeneratePath,

    /// Open paths may only be added as subject, never as clip.
    #[error("open paths must be added as subject")]
    OpenPathAsClip,

    /// Clipping open paths produces open output, which only the tree
    /// result can represent.
    #[error("open path clipping requires a tree solution")]
    OpenPathsRequireTree,

    /// An internal consistency check failed. This indicates a bug in the
    /// engine, not a problem with the input.
    #[error("internal error: {0}")]
    Internal(String),
}
