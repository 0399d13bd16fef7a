//! Exact Index (C4): group sentence items by normalized form and emit all
//! cross-document pairs within each group.

use std::collections::{BTreeMap, BTreeSet};

use dedup_core::{canonical_pair, ExactPair, SentenceItem};

/// Compute every cross-document exact-match pair over `items`.
///
/// Returned pairs are canonically ordered (`gid_a < gid_b`) and sorted.
pub fn exact_pairs(items: &[SentenceItem]) -> Vec<ExactPair> {
    let mut by_norm: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, item) in items.iter().enumerate() {
        by_norm.entry(item.norm.as_str()).or_default().push(idx);
    }

    let mut pairs: BTreeSet<(u32, u32)> = BTreeSet::new();
    for idxs in by_norm.values() {
        if idxs.len() < 2 {
            continue;
        }
        let mut doc_groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for &idx in idxs {
            doc_groups.entry(items[idx].doc_id).or_default().push(idx);
        }
        let docs: Vec<u32> = doc_groups.keys().copied().collect();
        if docs.len() < 2 {
            continue;
        }
        for i in 0..docs.len() {
            for j in (i + 1)..docs.len() {
                let da = &doc_groups[&docs[i]];
                let db = &doc_groups[&docs[j]];
                for &ia in da {
                    for &ib in db {
                        pairs.insert(canonical_pair(items[ia].gid, items[ib].gid));
                    }
                }
            }
        }
    }

    pairs
        .into_iter()
        .map(|(gid_a, gid_b)| ExactPair { gid_a, gid_b })
        .collect()
}
