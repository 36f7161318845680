//! Common token model shared by every OCR backend.
//!
//! Backends report words in different shapes - columnar frames with
//! structural identifiers (Tesseract) or plain geometry tuples (EasyOCR).
//! The adapters here lower both into [`Token`], so aggregation and matching
//! never branch on engine identity.

use crate::geometry::BoundingBox;

/// Structural position of a word inside a Tesseract-style layout tree.
///
/// Ordering follows reading order: page, then block, paragraph and line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub page: u32,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

/// One OCR-recognized word with its bounding box and confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Backend-native confidence on a 0-100 scale.
    pub confidence: f32,
    /// Present for backends that expose page/block/paragraph/line structure.
    pub group: Option<GroupKey>,
}

impl Token {
    pub fn new(
        text: impl Into<String>,
        left: i32,
        top: i32,
        width: i32,
        height: i32,
        confidence: f32,
    ) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            width,
            height,
            confidence,
            group: None,
        }
    }

    pub fn with_group(mut self, group: GroupKey) -> Self {
        self.group = Some(group);
        self
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.width, self.height)
    }

    /// Usable for aggregation: visible text and a real area.
    pub(crate) fn is_substantial(&self) -> bool {
        !self.text.trim().is_empty() && self.width > 0 && self.height > 0
    }
}

/// Columnar word data in the shape Tesseract emits: one entry per word
/// across parallel arrays.
#[derive(Debug, Clone, Default)]
pub struct TesseractFrame {
    pub text: Vec<String>,
    pub left: Vec<i32>,
    pub top: Vec<i32>,
    pub width: Vec<i32>,
    pub height: Vec<i32>,
    pub conf: Vec<f32>,
    pub page_num: Vec<u32>,
    pub block_num: Vec<u32>,
    pub par_num: Vec<u32>,
    pub line_num: Vec<u32>,
}

impl TesseractFrame {
    /// Lower the columnar frame into tokens. Trailing rows missing from any
    /// column are dropped rather than guessed.
    pub fn into_tokens(self) -> Vec<Token> {
        let rows = [
            self.text.len(),
            self.left.len(),
            self.top.len(),
            self.width.len(),
            self.height.len(),
            self.conf.len(),
            self.page_num.len(),
            self.block_num.len(),
            self.par_num.len(),
            self.line_num.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);

        let mut tokens = Vec::with_capacity(rows);
        for i in 0..rows {
            tokens.push(
                Token::new(
                    self.text[i].clone(),
                    self.left[i],
                    self.top[i],
                    self.width[i],
                    self.height[i],
                    self.conf[i],
                )
                .with_group(GroupKey {
                    page: self.page_num[i],
                    block: self.block_num[i],
                    paragraph: self.par_num[i],
                    line: self.line_num[i],
                }),
            );
        }
        tokens
    }
}

/// One EasyOCR-style detection: a quadrilateral, the recognized text and a
/// confidence on a 0-1 scale.
#[derive(Debug, Clone)]
pub struct EasyOcrDetection {
    pub quad: [(f32, f32); 4],
    pub text: String,
    pub confidence: f32,
}

impl EasyOcrDetection {
    /// Axis-aligned token from the detection quad, confidence rescaled to
    /// the common 0-100 range. No structural grouping is available.
    pub fn into_token(self) -> Token {
        let min_x = self.quad.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let min_y = self.quad.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_x = self
            .quad
            .iter()
            .map(|p| p.0)
            .fold(f32::NEG_INFINITY, f32::max);
        let max_y = self
            .quad
            .iter()
            .map(|p| p.1)
            .fold(f32::NEG_INFINITY, f32::max);

        Token::new(
            self.text,
            min_x.floor() as i32,
            min_y.floor() as i32,
            (max_x - min_x).ceil() as i32,
            (max_y - min_y).ceil() as i32,
            self.confidence * 100.0,
        )
    }
}
