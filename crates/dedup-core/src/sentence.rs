//! Sentence splitting: break a document's extracted text into an ordered
//! sequence of sentence strings, with a length-bound safety split for
//! pathologically long pieces.

use regex::Regex;
use std::sync::OnceLock;

fn terminator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?:;]\s+").expect("static regex is valid"))
}

/// Split `text` into raw sentence pieces.
///
/// CR/LF runs collapse to a single space first. Splits occur at whitespace
/// immediately following one of `. ! ? : ;`; the terminator stays with the
/// left piece. Pieces longer than 80 whitespace-delimited tokens are cut
/// into contiguous 30-token chunks.
pub fn split_sentences(text: &str) -> Vec<String> {
    let flattened = collapse_newlines(text);
    let mut pieces = Vec::new();
    let mut prev = 0;
    for m in terminator_re().find_iter(&flattened) {
        // terminator is a single ASCII byte, so start+1 is a valid char boundary.
        let cut = m.start() + 1;
        pieces.push(flattened[prev..cut].to_string());
        prev = m.end();
    }
    if prev < flattened.len() {
        pieces.push(flattened[prev..].to_string());
    }

    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.extend(safety_split(trimmed));
    }
    out
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == '\r' || c == '\n' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Cut `piece` into 30-token chunks if it exceeds 80 whitespace-delimited
/// tokens; otherwise return it unchanged as the sole element.
fn safety_split(piece: &str) -> Vec<String> {
    let tokens: Vec<&str> = piece.split_whitespace().collect();
    if tokens.len() <= 80 {
        return vec![piece.to_string()];
    }
    tokens
        .chunks(30)
        .map(|chunk| chunk.join(" "))
        .collect()
}
