//! ocr-locator - screen text location from raw OCR output
//!
//! Resolves a caller-specified text target (a literal string, a list of
//! acceptable spellings, or a two-word pair) into a single best-matching
//! screen region. Input is per-word recognition output from one or more OCR
//! backends; the crate tolerates OCR noise, Turkish diacritics and
//! heterogeneous backend schemas, and maps result boxes back from the
//! processed capture to absolute screen pixels.
//!
//! Screen capture, input actuation and the OCR engines themselves are
//! external collaborators behind the [`backend::OcrSource`] seam.

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod line;
pub mod locator;
pub mod matcher;
pub mod normalize;
pub mod token;

pub use backend::{EngineKind, OcrSource, TokenCapture};
pub use config::{load_config, save_config, LocatorConfig};
pub use diagnostics::{DiagEvent, DiagnosticsSink, NullSink, TracingSink};
pub use error::LocateError;
pub use geometry::{map_to_absolute, BoundingBox, Region};
pub use line::{aggregate, Line};
pub use locator::{FindOptions, MatchResult, PairOptions, TextLocator};
pub use matcher::{similarity_ratio, MatchTarget, TextTarget};
pub use normalize::normalize;
pub use token::{EasyOcrDetection, GroupKey, TesseractFrame, Token};
