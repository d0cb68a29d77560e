//! Error type shared by all grid-inference operations.

use thiserror::Error;

/// Errors returned by grid inference.
///
/// Every variant describes a problem with the caller's data, not a defect in
/// the crate. None of them is retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Malformed input: zero counts, unknown literals, mismatched lengths,
    /// non-finite coordinates.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No admissible `(rows, cols)` factorization for the tile count.
    #[error("cannot determine grid dimensions for {n} tiles")]
    DimensionsUndeterminable {
        /// Requested tile count.
        n: usize,
    },
    /// Fill-order or direction tests were inconclusive.
    #[error("cannot determine stitch layout: {0}")]
    LayoutUndeterminable(String),
    /// Clustered positions do not cover exactly the expected number of cells.
    #[error("inconsistent acquisition metadata: {0}")]
    MetadataInconsistency(String),
}

impl GridError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn layout(msg: impl Into<String>) -> Self {
        Self::LayoutUndeterminable(msg.into())
    }

    pub(crate) fn inconsistent(msg: impl Into<String>) -> Self {
        Self::MetadataInconsistency(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
