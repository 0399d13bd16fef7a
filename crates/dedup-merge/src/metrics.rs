//! Metrics Aggregator (C9): per-document coverage metrics and the run
//! summary.

use std::collections::{BTreeMap, BTreeSet};

use dedup_core::{Document, Params, SentenceItem};
use serde::Serialize;

use crate::block::InBlockSentences;

/// Per-document coverage row, matching `doc_metrics.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DocMetrics {
    pub doc: String,
    pub total_sentences: u32,
    pub matched_sentences_any: u32,
    pub matched_sentences_pct: f64,
    pub in_block_sentences: u32,
    pub in_block_sentences_pct: f64,
}

fn pct(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (100.0 * count as f64 / total as f64 * 100.0).round() / 100.0
}

/// Compute per-document metrics for every document in discovery order.
///
/// `matched_gids` is the union of sentence global-ids appearing in any
/// channel's pair set (see [`dedup_engine::matched_gids`]); `in_block` is
/// produced by [`crate::block::merge_blocks`].
pub fn doc_metrics(
    documents: &[Document],
    items: &[SentenceItem],
    matched_gids: &BTreeSet<u32>,
    in_block: &InBlockSentences,
) -> Vec<DocMetrics> {
    let mut total_by_doc: BTreeMap<u32, u32> = BTreeMap::new();
    let mut matched_by_doc: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();

    for item in items {
        *total_by_doc.entry(item.doc_id).or_insert(0) += 1;
        if matched_gids.contains(&item.gid) {
            matched_by_doc
                .entry(item.doc_id)
                .or_default()
                .insert(item.sent_id);
        }
    }

    documents
        .iter()
        .map(|doc| {
            let total = *total_by_doc.get(&doc.doc_id).unwrap_or(&0);
            let matched = matched_by_doc
                .get(&doc.doc_id)
                .map(|s| s.len() as u32)
                .unwrap_or(0);
            let blocked = in_block
                .get(&doc.doc_id)
                .map(|s| s.len() as u32)
                .unwrap_or(0);
            DocMetrics {
                doc: doc.name.clone(),
                total_sentences: total,
                matched_sentences_any: matched,
                matched_sentences_pct: pct(matched, total),
                in_block_sentences: blocked,
                in_block_sentences_pct: pct(blocked, total),
            }
        })
        .collect()
}

/// The run-wide summary written to `summary.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub n_documents: usize,
    pub n_sentences_kept: usize,
    pub exact_pairs: usize,
    pub simhash_pairs_moderate: usize,
    pub simhash_pairs_strict: usize,
    pub embed_pairs_moderate: usize,
    pub embed_pairs_strict: usize,
    pub block_matches: usize,
    pub params: Params,
    pub docs: Vec<String>,
}
