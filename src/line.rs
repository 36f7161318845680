//! Groups word tokens into visual text lines.

use std::collections::BTreeMap;

use crate::geometry::BoundingBox;
use crate::normalize::normalize;
use crate::token::{GroupKey, Token};

/// A visual text line assembled from adjacent word tokens.
#[derive(Debug, Clone)]
pub struct Line {
    /// Member tokens ordered left to right.
    pub tokens: Vec<Token>,
    /// Union of the member token boxes.
    pub bbox: BoundingBox,
    /// Member texts joined with single spaces.
    pub raw_text: String,
    /// [`normalize`] applied to `raw_text`.
    pub normalized_text: String,
}

impl Line {
    fn from_tokens(mut tokens: Vec<Token>) -> Line {
        tokens.sort_by_key(|t| (t.left, t.top));

        let bbox = tokens
            .iter()
            .map(Token::bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(BoundingBox::new(0, 0, 0, 0));

        let raw_text = tokens
            .iter()
            .map(|t| t.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let normalized_text = normalize(&raw_text);

        Line {
            tokens,
            bbox,
            raw_text,
            normalized_text,
        }
    }
}

/// Group tokens into lines.
///
/// Blank, zero-area and low-confidence tokens (`min_confidence` on the
/// backend-native 0-100 scale) are discarded first. When every surviving
/// token carries a structural [`GroupKey`] the backend's own line structure
/// is used; otherwise tokens are clustered by vertical proximity: a token
/// starts a new line once its top sits more than `gap_px` below the current
/// line's first token.
pub fn aggregate(tokens: &[Token], min_confidence: f32, gap_px: i32) -> Vec<Line> {
    let kept: Vec<Token> = tokens
        .iter()
        .filter(|t| t.is_substantial() && t.confidence >= min_confidence)
        .cloned()
        .collect();

    if kept.is_empty() {
        return Vec::new();
    }

    if kept.iter().all(|t| t.group.is_some()) {
        group_by_key(kept)
    } else {
        cluster_by_gap(kept, gap_px)
    }
}

/// Bucket tokens by their structural key, emitting lines in reading order.
fn group_by_key(tokens: Vec<Token>) -> Vec<Line> {
    let mut buckets: BTreeMap<GroupKey, Vec<Token>> = BTreeMap::new();
    for token in tokens {
        if let Some(key) = token.group {
            buckets.entry(key).or_default().push(token);
        }
    }
    buckets.into_values().map(Line::from_tokens).collect()
}

/// Cluster geometry-only tokens into lines by the vertical-gap rule.
fn cluster_by_gap(mut tokens: Vec<Token>, gap_px: i32) -> Vec<Line> {
    tokens.sort_by_key(|t| (t.top, t.left));

    let mut lines = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut line_top = 0;

    for token in tokens {
        if current.is_empty() {
            line_top = token.top;
        } else if token.top - line_top > gap_px {
            lines.push(Line::from_tokens(std::mem::take(&mut current)));
            line_top = token.top;
        }
        current.push(token);
    }
    if !current.is_empty() {
        lines.push(Line::from_tokens(current));
    }

    lines
}
