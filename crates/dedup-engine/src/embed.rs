//! Embedding Index (C6, optional): top-k cosine nearest-neighbor search over
//! unit-norm sentence vectors.
//!
//! The embedder is an external collaborator abstracted behind [`Embedder`];
//! this crate ships only [`HashingEmbedder`], a deterministic bag-of-words
//! stand-in used so the C6/C7 code paths and their tests are exercised
//! without a real model. Swapping in a production embedding client is an
//! integration concern outside this crate.

use dedup_core::{canonical_pair, tokenize_words, EmbedPair, SentenceItem};
use thiserror::Error;

/// Failure to construct or query an embedding service.
#[derive(Debug, Error)]
#[error("embedder unavailable: {0}")]
pub struct EmbedError(pub String);

/// A sentence embedder: maps strings to unit-norm vectors.
pub trait Embedder {
    fn embed(&self, sentences: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

const HASH_DIMS: usize = 64;

/// Deterministic bag-of-words hashing embedder. Not a quality claim — it
/// exists only so the embedding pipeline has a concrete, dependency-free
/// implementation to run against.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashingEmbedder;

impl Embedder for HashingEmbedder {
    fn embed(&self, sentences: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(sentences.iter().map(|s| hash_embed(s)).collect())
    }
}

fn hash_embed(sentence: &str) -> Vec<f32> {
    let mut v = vec![0f32; HASH_DIMS];
    for token in tokenize_words(sentence) {
        let h = dedup_core::md5_64(&token);
        let bucket = (h as usize) % HASH_DIMS;
        v[bucket] += 1.0;
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Inner product of two equal-length unit-norm vectors (== cosine similarity).
fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Brute-force top-`k` search (by inner product, descending) of `query`
/// against every row of `vectors`, including `query`'s own index.
fn topk(vectors: &[Vec<f32>], query_idx: usize, k: usize) -> Vec<(usize, f32)> {
    let query = &vectors[query_idx];
    let mut scored: Vec<(usize, f32)> = vectors
        .iter()
        .enumerate()
        .map(|(idx, v)| (idx, inner_product(query, v)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then(a.0.cmp(&b.0)));
    scored.truncate(k);
    scored
}

/// Compute the moderate-stratum embedding candidate pairs over `items`.
///
/// Returns `Ok(None)` if the embedder could not be constructed/queried —
/// callers must log a warning and treat C6 as disabled for the run.
pub fn embed_pairs(
    items: &[SentenceItem],
    embedder: &dyn Embedder,
    topk_n: usize,
    threshold_moderate: f32,
) -> Result<Vec<EmbedPair>, EmbedError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let norms: Vec<&str> = items.iter().map(|it| it.norm.as_str()).collect();
    let vectors = embedder.embed(&norms)?;

    let mut best: std::collections::HashMap<(u32, u32), f32> = std::collections::HashMap::new();
    for i in 0..items.len() {
        for (j, cosine) in topk(&vectors, i, topk_n) {
            if j == i {
                continue;
            }
            if items[i].doc_id == items[j].doc_id {
                continue;
            }
            if cosine < threshold_moderate {
                continue;
            }
            let key = canonical_pair(items[i].gid, items[j].gid);
            let entry = best.entry(key).or_insert(f32::MIN);
            if cosine > *entry {
                *entry = cosine;
            }
        }
    }

    let mut out: Vec<EmbedPair> = best
        .into_iter()
        .map(|((gid_a, gid_b), cosine)| EmbedPair { gid_a, gid_b, cosine })
        .collect();
    out.sort_by(|a, b| (a.gid_a, a.gid_b).cmp(&(b.gid_a, b.gid_b)));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(gid: u32, doc_id: u32, norm: &str) -> SentenceItem {
        SentenceItem {
            gid,
            doc_id,
            sent_id: gid,
            raw: norm.to_string(),
            norm: norm.to_string(),
            sig: 0,
        }
    }

    #[test]
    fn hashing_embedder_produces_unit_norm_vectors() {
        let embedder = HashingEmbedder;
        let vecs = embedder.embed(&["hello world", "goodbye"]).unwrap();
        for v in &vecs {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4 || norm == 0.0);
        }
    }

    #[test]
    fn identical_sentences_embed_to_cosine_one() {
        let embedder = HashingEmbedder;
        let vecs = embedder.embed(&["same text here", "same text here"]).unwrap();
        let cos = inner_product(&vecs[0], &vecs[1]);
        assert!((cos - 1.0).abs() < 1e-4);
    }

    #[test]
    fn no_pair_for_same_document() {
        let items = vec![item(0, 0, "alpha beta gamma"), item(1, 0, "alpha beta gamma")];
        let pairs = embed_pairs(&items, &HashingEmbedder, 8, 0.5).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn cross_document_identical_text_produces_pair() {
        let items = vec![item(0, 0, "alpha beta gamma"), item(1, 1, "alpha beta gamma")];
        let pairs = embed_pairs(&items, &HashingEmbedder, 8, 0.5).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].cosine >= 0.99);
    }

    #[test]
    fn below_threshold_excluded() {
        let items = vec![item(0, 0, "alpha beta gamma"), item(1, 1, "zulu yankee xray")];
        let pairs = embed_pairs(&items, &HashingEmbedder, 8, 0.999).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn empty_items_yields_no_pairs() {
        let pairs = embed_pairs(&[], &HashingEmbedder, 8, 0.5).unwrap();
        assert!(pairs.is_empty());
    }
}
