//! Locale-tolerant text canonicalization.
//!
//! OCR output for Turkish UIs mixes diacritics, several dash variants and
//! the occasional mojibake from a Latin-1 round trip. Every comparison in
//! this crate happens on the canonical form produced here.

use unicode_normalization::UnicodeNormalization;

/// Combining marks produced by decomposing the Turkish letters this crate
/// folds: dot above (İ), breve (ğ), cedilla (ş, ç) and diaeresis (ö, ü).
fn is_folded_mark(ch: char) -> bool {
    matches!(ch, '\u{0307}' | '\u{0306}' | '\u{0327}' | '\u{0308}')
}

/// Canonicalize a raw OCR string for comparison.
///
/// In order: repair Latin-1-as-UTF-8 mojibake (best effort, never fails),
/// Unicode canonical decomposition, Turkish character folding (İ→I, ı→i,
/// ş→s, ğ→g, ç→c, ö→o, ü→u, case preserved), dash unification to an ASCII
/// hyphen, whitespace collapse and trim, lowercase. Idempotent: applying it
/// twice yields the same string.
pub fn normalize(text: &str) -> String {
    // Lowercasing can turn a byte-invalid string into a repairable one
    // (uppercase Latin-1 letters sit outside the UTF-8 continuation range),
    // so a single pass is not always a fixed point. Each repair shortens
    // the string, so iteration converges, in practice within two passes.
    let mut out = normalize_once(text);
    loop {
        let next = normalize_once(&out);
        if next == out {
            return out;
        }
        out = next;
    }
}

fn normalize_once(text: &str) -> String {
    let repaired = repair_mojibake(text);

    let mut out = String::with_capacity(repaired.len());
    let mut pending_space = false;

    for ch in repaired.nfd() {
        if is_folded_mark(ch) {
            continue;
        }
        let ch = match ch {
            // Dotless i never decomposes, so it is folded directly.
            '\u{0131}' => 'i',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            c => c,
        };
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for low in ch.to_lowercase() {
            out.push(low);
        }
    }

    out
}

/// Best-effort repair of UTF-8 text that went through a Latin-1 decode.
///
/// Mojibake of that kind consists solely of code points below U+0100 whose
/// byte values form a valid multi-byte UTF-8 sequence. Anything else is
/// returned unchanged.
fn repair_mojibake(text: &str) -> String {
    if text.is_ascii() || text.chars().any(|c| c as u32 > 0xFF) {
        return text.to_string();
    }
    let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
    match String::from_utf8(bytes) {
        Ok(repaired) => repaired,
        Err(_) => text.to_string(),
    }
}
