//! OCR backend seam.
//!
//! A source performs capture plus recognition as one step and reports the
//! scale factors its preprocessing applied, so result boxes can be mapped
//! back to screen space. Errors stay `anyhow` at this seam; the orchestrator
//! recovers them and moves on to the next source.

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::geometry::Region;
use crate::token::Token;

/// Identity of the engine that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Tesseract,
    EasyOcr,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Tesseract => write!(f, "tesseract"),
            EngineKind::EasyOcr => write!(f, "easyocr"),
        }
    }
}

/// Tokens recognized in one capture, with the preprocessing scale factors
/// that were applied to the captured image before recognition.
#[derive(Debug, Clone)]
pub struct TokenCapture {
    pub tokens: Vec<Token>,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl TokenCapture {
    /// A capture taken at original resolution.
    pub fn unscaled(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn scaled(tokens: Vec<Token>, scale_x: f32, scale_y: f32) -> Self {
        Self {
            tokens,
            scale_x,
            scale_y,
        }
    }
}

/// One OCR engine behind the orchestrator.
///
/// Sources are tried strictly in the order they were registered with the
/// locator; the first satisfying match wins and later sources are not
/// invoked.
pub trait OcrSource {
    fn kind(&self) -> EngineKind;

    /// Capture the given region (full screen when `None`) and recognize
    /// word tokens in it.
    fn capture_tokens(&self, region: Option<&Region>) -> Result<TokenCapture>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_kind_display() {
        assert_eq!(EngineKind::Tesseract.to_string(), "tesseract");
        assert_eq!(EngineKind::EasyOcr.to_string(), "easyocr");
    }

    #[test]
    fn test_unscaled_capture() {
        let capture = TokenCapture::unscaled(vec![]);
        assert_eq!(capture.scale_x, 1.0);
        assert_eq!(capture.scale_y, 1.0);
    }
}
