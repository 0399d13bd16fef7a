//! Core data model: documents, sentence items, pairs, blocks and the
//! parameter record threaded through every component.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An input document, identified by a dense `doc_id` assigned in
/// lexicographic order of discovery. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Document {
    pub doc_id: u32,
    pub name: String,
    pub path: PathBuf,
}

/// A single surviving sentence, the central record of the engine.
///
/// `sent_id` is assigned after short-sentence filtering, so it is dense
/// within the engine's view even though it may skip raw-document positions.
#[derive(Debug, Clone)]
pub struct SentenceItem {
    pub gid: u32,
    pub doc_id: u32,
    pub sent_id: u32,
    pub raw: String,
    pub norm: String,
    pub sig: u64,
}

/// Canonicalize an unordered pair of global ids so `a < b` always holds.
pub fn canonical_pair(x: u32, y: u32) -> (u32, u32) {
    if x < y {
        (x, y)
    } else {
        (y, x)
    }
}

/// An exact-match pair: two sentence items with byte-identical `norm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExactPair {
    pub gid_a: u32,
    pub gid_b: u32,
}

/// A SimHash/LSH candidate pair with its Hamming distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPair {
    pub gid_a: u32,
    pub gid_b: u32,
    pub hamming: u32,
}

/// An embedding nearest-neighbor pair with its cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbedPair {
    pub gid_a: u32,
    pub gid_b: u32,
    pub cosine: f32,
}

/// A maximal run of aligned consecutive sentence matches between two
/// documents, `doc_a < doc_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub doc_a: u32,
    pub a_start: u32,
    pub a_end: u32,
    pub doc_b: u32,
    pub b_start: u32,
    pub b_end: u32,
    pub len: u32,
}

/// Run-wide tunable parameters, built once from CLI arguments and passed
/// by shared reference to every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Params {
    pub min_sentence_words: usize,
    pub sim_ngram: usize,
    pub sim_hamming_strict: u32,
    pub sim_hamming_moderate: u32,
    pub use_embeddings: bool,
    pub embed_model: String,
    pub embed_threshold_strict: f32,
    pub embed_threshold_moderate: f32,
    pub topk: usize,
    pub block_min_run: u32,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            min_sentence_words: 8,
            sim_ngram: 3,
            sim_hamming_strict: 6,
            sim_hamming_moderate: 8,
            use_embeddings: false,
            embed_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            embed_threshold_strict: 0.90,
            embed_threshold_moderate: 0.88,
            topk: 8,
            block_min_run: 2,
        }
    }
}
