//! Fuzzy line matching and two-word pair location.
//!
//! Matching is first-match by design: lines are scanned in aggregation
//! order and the earliest satisfying line/variant pair wins, which favors
//! the topmost occurrence in menu and toolbar layouts. There is no global
//! best-match search.

use tracing::debug;

use crate::error::LocateError;
use crate::geometry::BoundingBox;
use crate::line::Line;
use crate::normalize::normalize;

/// A text target as callers express it: one literal or several acceptable
/// spellings tried in order.
#[derive(Debug, Clone)]
pub enum TextTarget {
    Single(String),
    Variants(Vec<String>),
}

impl TextTarget {
    pub fn variants(&self) -> &[String] {
        match self {
            TextTarget::Single(s) => std::slice::from_ref(s),
            TextTarget::Variants(v) => v,
        }
    }
}

impl From<&str> for TextTarget {
    fn from(s: &str) -> Self {
        TextTarget::Single(s.to_string())
    }
}

impl From<String> for TextTarget {
    fn from(s: String) -> Self {
        TextTarget::Single(s)
    }
}

impl From<Vec<String>> for TextTarget {
    fn from(v: Vec<String>) -> Self {
        TextTarget::Variants(v)
    }
}

impl From<&[&str]> for TextTarget {
    fn from(v: &[&str]) -> Self {
        TextTarget::Variants(v.iter().map(|s| s.to_string()).collect())
    }
}

/// A lowered target: ordered variants paired with their canonical form,
/// deduplicated, plus the similarity threshold.
#[derive(Debug, Clone)]
pub struct MatchTarget {
    /// `(raw, canonical)` pairs in caller order, unique by canonical form.
    variants: Vec<(String, String)>,
    threshold: f32,
    normalized: bool,
}

impl MatchTarget {
    /// Lower a caller target. Blank variants are discarded; a target that is
    /// entirely blank is invalid input, as is a threshold outside `[0, 1]`.
    pub fn new(target: &TextTarget, threshold: f32, normalized: bool) -> Result<Self, LocateError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LocateError::InvalidThreshold(threshold));
        }

        let mut variants: Vec<(String, String)> = Vec::new();
        for raw in target.variants() {
            let canon = if normalized {
                normalize(raw)
            } else {
                raw.trim().to_string()
            };
            if canon.is_empty() {
                continue;
            }
            if variants.iter().any(|(_, c)| c == &canon) {
                continue;
            }
            variants.push((raw.clone(), canon));
        }

        if variants.is_empty() {
            return Err(LocateError::EmptyTarget);
        }

        Ok(Self {
            variants,
            threshold,
            normalized,
        })
    }

    fn comparable<'a>(&self, line: &'a Line) -> &'a str {
        if self.normalized {
            &line.normalized_text
        } else {
            line.raw_text.trim()
        }
    }
}

/// Outcome of a successful line match, still in processed-image coordinates.
#[derive(Debug, Clone)]
pub struct LineMatch {
    pub bbox: BoundingBox,
    pub matched_variant: String,
    pub line_text: String,
}

/// Scan lines in order against the target; the first satisfying line/variant
/// pair wins.
pub fn match_lines(lines: &[Line], target: &MatchTarget) -> Option<LineMatch> {
    for line in lines {
        let text = target.comparable(line);
        if text.is_empty() {
            continue;
        }
        for (raw, canon) in &target.variants {
            if is_match(text, canon, target.threshold) {
                debug!(line = %line.raw_text, variant = %raw, "line matched target");
                return Some(LineMatch {
                    bbox: line.bbox,
                    matched_variant: raw.clone(),
                    line_text: line.raw_text.clone(),
                });
            }
        }
    }
    None
}

/// Exact, substring in either direction, or similarity at the threshold.
fn is_match(line: &str, variant: &str, threshold: f32) -> bool {
    line == variant
        || line.contains(variant)
        || variant.contains(line)
        || similarity_ratio(line, variant) >= threshold
}

/// Ratcliff/Obershelp similarity: `2*M / (len(a) + len(b))` where `M` counts
/// characters covered by recursively-found longest common runs.
pub fn similarity_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let matched = matching_chars(&a, &b);
    2.0 * matched as f32 / (a.len() + b.len()) as f32
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..ai], &b[..bi]) + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous run, earliest occurrence on ties.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut row = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let run = prev[j] + 1;
                row[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = row;
    }

    best
}

/// Find two known words on the same visual line within a horizontal gap
/// budget. Both words are compared in canonical form; the first qualifying
/// pair (line-major, then left to right) wins, and the result is the union
/// box of the two tokens.
pub fn find_pair(
    lines: &[Line],
    left_word: &str,
    right_word: &str,
    max_gap_px: i32,
) -> Option<BoundingBox> {
    let left_norm = normalize(left_word);
    let right_norm = normalize(right_word);

    for line in lines {
        for (i, first) in line.tokens.iter().enumerate() {
            if normalize(&first.text) != left_norm {
                continue;
            }
            for second in &line.tokens[i + 1..] {
                if second.left <= first.left || normalize(&second.text) != right_norm {
                    continue;
                }
                if second.left - first.left < max_gap_px {
                    debug!(left = %first.text, right = %second.text, "word pair located");
                    return Some(first.bbox().union(&second.bbox()));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::aggregate;
    use crate::token::Token;

    fn lines_from(tokens: &[Token]) -> Vec<Line> {
        aggregate(tokens, 0.0, 10)
    }

    fn target(variants: &[&str], threshold: f32) -> MatchTarget {
        MatchTarget::new(&TextTarget::from(variants), threshold, true).unwrap()
    }

    #[test]
    fn test_similarity_ratio_exact() {
        assert!((similarity_ratio("tamam", "tamam") - 1.0).abs() < 0.001);
        assert!((similarity_ratio("", "") - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_similarity_ratio_transposition() {
        // One transposition keeps the ratio at the default threshold.
        let ratio = similarity_ratio("tamma", "tamam");
        assert!(ratio < 1.0);
        assert!((ratio - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_similarity_ratio_disjoint() {
        assert!((similarity_ratio("abc", "xyz")).abs() < 0.001);
    }

    #[test]
    fn test_exact_and_substring_match() {
        let lines = lines_from(&[
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 70, 2, 40, 20, 88.0),
        ]);

        let exact = target(&["finans izle"], 0.8);
        assert!(match_lines(&lines, &exact).is_some());

        // Variant shorter than the line still matches as a substring.
        let partial = target(&["İzle"], 0.8);
        let found = match_lines(&lines, &partial).unwrap();
        assert_eq!(found.matched_variant, "İzle");
        assert_eq!(found.line_text, "Finans İzle");
    }

    #[test]
    fn test_fuzzy_match_at_threshold() {
        let lines = lines_from(&[Token::new("Tamma", 0, 0, 50, 20, 95.0)]);
        assert!(match_lines(&lines, &target(&["Tamam"], 0.8)).is_some());
        assert!(match_lines(&lines, &target(&["Tamam"], 0.9)).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let lines = lines_from(&[
            Token::new("Kaydet", 0, 0, 60, 20, 95.0),
            Token::new("Kaydet", 0, 100, 60, 20, 95.0),
        ]);

        let found = match_lines(&lines, &target(&["Kaydet"], 0.8)).unwrap();
        assert_eq!(found.bbox.y, 0);
    }

    #[test]
    fn test_blank_variants_are_rejected() {
        assert_eq!(
            MatchTarget::new(&TextTarget::from(&["", "  "][..]), 0.8, true).unwrap_err(),
            LocateError::EmptyTarget
        );
        assert_eq!(
            MatchTarget::new(&TextTarget::Variants(vec![]), 0.8, true).unwrap_err(),
            LocateError::EmptyTarget
        );
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        assert_eq!(
            MatchTarget::new(&TextTarget::from("x"), 1.5, true).unwrap_err(),
            LocateError::InvalidThreshold(1.5)
        );
    }

    #[test]
    fn test_raw_mode_skips_normalization() {
        let lines = lines_from(&[Token::new("İZLE", 0, 0, 40, 20, 95.0)]);
        let raw = MatchTarget::new(&TextTarget::from("izle"), 1.0, false).unwrap();
        assert!(match_lines(&lines, &raw).is_none());
    }

    #[test]
    fn test_no_lines_no_match() {
        assert!(match_lines(&[], &target(&["Tamam"], 0.8)).is_none());
    }

    #[test]
    fn test_find_pair_within_budget() {
        let lines = lines_from(&[
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 100, 2, 40, 20, 88.0),
        ]);

        let bbox = find_pair(&lines, "Finans", "İzle", 300).unwrap();
        assert_eq!(bbox, BoundingBox::new(0, 0, 140, 22));
    }

    #[test]
    fn test_find_pair_gap_budget_exceeded() {
        let lines = lines_from(&[
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 100, 2, 40, 20, 88.0),
        ]);

        assert!(find_pair(&lines, "Finans", "İzle", 50).is_none());
    }

    #[test]
    fn test_find_pair_requires_same_line() {
        let lines = lines_from(&[
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 100, 50, 40, 20, 88.0),
        ]);

        assert!(find_pair(&lines, "Finans", "İzle", 300).is_none());
    }

    #[test]
    fn test_find_pair_takes_first_qualifying_right_word() {
        let lines = lines_from(&[
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 80, 0, 40, 20, 88.0),
            Token::new("İzle", 200, 0, 40, 20, 88.0),
        ]);

        let bbox = find_pair(&lines, "Finans", "İzle", 300).unwrap();
        assert_eq!(bbox.width, 120);
    }
}
