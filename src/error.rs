//! Error taxonomy for locate requests.
//!
//! Only invalid input surfaces as an error. A failed OCR backend is
//! recovered inside the orchestrator, and "no match" is an `Ok(None)` /
//! `Ok(false)` outcome rather than an error.

use thiserror::Error;

/// A locate request was rejected before any OCR work happened.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocateError {
    /// The target had no non-empty variants after canonicalization.
    #[error("target has no non-empty variants")]
    EmptyTarget,

    /// One of the words of a pair query is blank.
    #[error("pair word {0:?} is empty after trimming")]
    EmptyPairWord(String),

    /// A region with empty or inverted dimensions.
    #[error("region dimensions must be positive, got {width}x{height}")]
    InvalidRegion { width: i32, height: i32 },

    /// A region with negative padding.
    #[error("region padding must be non-negative, got {0}")]
    NegativePadding(i32),

    /// Non-positive horizontal gap budget for a pair query.
    #[error("max gap must be positive, got {0}px")]
    InvalidGap(i32),

    /// A threshold outside the `[0, 1]` range.
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    /// A named target that is not present in the config target library.
    #[error("no target named {0:?} in the target library")]
    UnknownTarget(String),
}
