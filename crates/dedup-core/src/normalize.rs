//! Text normalization: map a raw extracted sentence to the canonical form
//! used for equality and feature extraction.
//!
//! Policy is deliberately conservative — case folding, smart-quote folding,
//! and whitespace collapse only. Equality downstream is byte-equality over
//! the normalized form; punctuation is never stripped.

/// Normalize `raw` into its canonical comparison form.
///
/// Pure and stateless: the same input always produces the same output.
pub fn normalize_sentence(raw: &str) -> String {
    let folded = raw.to_lowercase();
    let quotes_folded = fold_smart_quotes(&folded);
    collapse_whitespace(&quotes_folded)
}

fn fold_smart_quotes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}
