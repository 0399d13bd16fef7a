//! 64-bit SimHash signature construction over word n-gram shingles, plus the
//! banded LSH bucketing helper and Hamming distance used downstream.

use std::collections::HashMap;

/// Extract maximal runs of ASCII letters/digits from the lowercased input.
/// This is the only tokenizer in the engine — it feeds filtering, SimHash
/// features, and nothing else.
pub fn tokenize_words(s: &str) -> Vec<String> {
    let lower = s.to_lowercase();
    let mut words = Vec::new();
    let mut current = String::new();
    for c in lower.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// First 8 bytes of MD5(`s`), interpreted as a big-endian unsigned 64-bit
/// integer. MD5 is used purely as a fast mixing function, not for integrity.
pub fn md5_64(s: &str) -> u64 {
    let digest = md5::compute(s.as_bytes());
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest.0[..8]);
    u64::from_be_bytes(buf)
}

/// Compute the 64-bit SimHash of `norm` over whitespace-joined word n-grams
/// of width `ngram`. If there are fewer tokens than `ngram`, individual
/// tokens are used as features instead.
pub fn simhash64(norm: &str, ngram: usize) -> u64 {
    let tokens = tokenize_words(norm);
    let features = shingle(&tokens, ngram);

    let mut counts: HashMap<String, i64> = HashMap::new();
    for f in features {
        *counts.entry(f).or_insert(0) += 1;
    }

    let mut v = [0i64; 64];
    for (feat, w) in counts {
        let h = md5_64(&feat);
        for (i, slot) in v.iter_mut().enumerate() {
            if (h >> i) & 1 == 1 {
                *slot += w;
            } else {
                *slot -= w;
            }
        }
    }

    let mut sig: u64 = 0;
    for (i, val) in v.iter().enumerate() {
        if *val >= 0 {
            sig |= 1 << i;
        }
    }
    sig
}

fn shingle(tokens: &[String], ngram: usize) -> Vec<String> {
    if tokens.len() < ngram {
        return tokens.to_vec();
    }
    tokens
        .windows(ngram)
        .map(|w| w.join(" "))
        .collect()
}

/// Number of differing bits between two signatures.
pub fn hamming(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Yield `(band_index, band_value)` for each of `bands` fixed-width bit
/// slices of `sig`, `width` bits wide, least-significant band first.
pub fn bands64(sig: u64, bands: u32, width: u32) -> Vec<(u32, u64)> {
    let mask = (1u64 << width) - 1;
    (0..bands)
        .map(|i| (i, (sig >> (i * width)) & mask))
        .collect()
}
