//! Block Merger (C8): merge per-document-pair sentence-id edges into
//! maximal consecutive-sentence runs.
//!
//! The greedy run extension here is deliberately not maximum-coverage
//! alignment; it is a local-greedy, deterministic choice that must be
//! matched exactly to preserve output stability (see module-level notes
//! on pathological interleaved runs).

use std::collections::{BTreeMap, BTreeSet};

use dedup_core::Block;
use dedup_engine::Edge;

/// Per-document sets of sentence ids covered by an emitted block.
pub type InBlockSentences = BTreeMap<u32, BTreeSet<u32>>;

/// Merge the union edge set of every document pair into blocks.
///
/// `edges` must be keyed `(doc_a, doc_b)` with `doc_a < doc_b`, as produced
/// by [`dedup_engine::union_edges`].
pub fn merge_blocks(
    edges: &BTreeMap<(u32, u32), BTreeSet<Edge>>,
    block_min_run: u32,
) -> (Vec<Block>, InBlockSentences) {
    let mut blocks = Vec::new();
    let mut in_block: InBlockSentences = BTreeMap::new();

    for (&(doc_a, doc_b), pairs) in edges {
        let pts: Vec<Edge> = pairs.iter().copied().collect();
        let mut i = 0;
        while i < pts.len() {
            let (a0, b0) = pts[i];
            let (mut a1, mut b1) = (a0, b0);
            let mut j = i + 1;
            while j < pts.len() && pts[j] == (a1 + 1, b1 + 1) {
                a1 = pts[j].0;
                b1 = pts[j].1;
                j += 1;
            }
            let run_len = a1 - a0 + 1;
            if run_len >= block_min_run {
                blocks.push(Block {
                    doc_a,
                    a_start: a0,
                    a_end: a1,
                    doc_b,
                    b_start: b0,
                    b_end: b1,
                    len: run_len,
                });
                let a_set = in_block.entry(doc_a).or_default();
                for s in a0..=a1 {
                    a_set.insert(s);
                }
                let b_set = in_block.entry(doc_b).or_default();
                for s in b0..=b1 {
                    b_set.insert(s);
                }
            }
            i = j;
        }
    }

    (blocks, in_block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges_from(pairs: &[Edge]) -> BTreeMap<(u32, u32), BTreeSet<Edge>> {
        let mut set = BTreeSet::new();
        for &p in pairs {
            set.insert(p);
        }
        let mut m = BTreeMap::new();
        m.insert((0, 1), set);
        m
    }

    #[test]
    fn merges_three_consecutive_pairs_into_one_block() {
        let edges = edges_from(&[(4, 10), (5, 11), (6, 12)]);
        let (blocks, in_block) = merge_blocks(&edges, 2);
        assert_eq!(blocks.len(), 1);
        let b = blocks[0];
        assert_eq!((b.doc_a, b.a_start, b.a_end), (0, 4, 6));
        assert_eq!((b.doc_b, b.b_start, b.b_end), (1, 10, 12));
        assert_eq!(b.len, 3);
        assert_eq!(in_block[&0], BTreeSet::from([4, 5, 6]));
        assert_eq!(in_block[&1], BTreeSet::from([10, 11, 12]));
    }

    #[test]
    fn single_pair_below_min_run_is_discarded() {
        let edges = edges_from(&[(0, 0)]);
        let (blocks, in_block) = merge_blocks(&edges, 2);
        assert!(blocks.is_empty());
        assert!(in_block.is_empty());
    }

    #[test]
    fn block_min_run_one_emits_isolated_pairs() {
        let edges = edges_from(&[(0, 0), (5, 9)]);
        let (blocks, _) = merge_blocks(&edges, 1);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn non_consecutive_pairs_start_separate_runs() {
        let edges = edges_from(&[(0, 0), (1, 1), (5, 5), (6, 6)]);
        let (blocks, _) = merge_blocks(&edges, 2);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn requires_both_sides_to_increment_together() {
        // (0,0) then (1,5): sentA increments but sentB does not follow.
        let edges = edges_from(&[(0, 0), (1, 5)]);
        let (blocks, _) = merge_blocks(&edges, 2);
        assert!(blocks.is_empty());
    }

    #[test]
    fn empty_edges_yield_no_blocks() {
        let edges = BTreeMap::new();
        let (blocks, in_block) = merge_blocks(&edges, 2);
        assert!(blocks.is_empty());
        assert!(in_block.is_empty());
    }
}
