//! LSH Band Index (C5): bucket signatures into fixed-width bit bands and
//! generate near-duplicate candidate pairs. This is the performance-critical
//! hot path — bucket-wise all-pairs scans run in parallel, sorted back into
//! a deterministic order before the cross-bucket dedup pass.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;

use dedup_core::{bands64, canonical_pair, hamming, SentenceItem, SimPair};

const BANDS: u32 = 8;
const BAND_WIDTH: u32 = 8;

/// Compute the moderate-stratum SimHash candidate pairs over `items`.
///
/// Callers derive the strict stratum by filtering on `hamming <=
/// sim_hamming_strict`; both strata share this single pair set.
pub fn lsh_pairs(items: &[SentenceItem], sim_hamming_moderate: u32) -> Vec<SimPair> {
    let mut buckets: BTreeMap<(u32, u64), Vec<usize>> = BTreeMap::new();
    for (idx, item) in items.iter().enumerate() {
        for key in bands64(item.sig, BANDS, BAND_WIDTH) {
            buckets.entry(key).or_default().push(idx);
        }
    }

    // Deterministic bucket order, independent of HashMap iteration order.
    let bucket_list: Vec<&Vec<usize>> = buckets.values().collect();

    let mut indexed: Vec<(usize, Vec<(u32, u32, u32)>)> = bucket_list
        .par_iter()
        .enumerate()
        .map(|(bucket_idx, idxs)| {
            let mut local = Vec::new();
            for i in 0..idxs.len() {
                let ia = idxs[i];
                for &ib in &idxs[i + 1..] {
                    if items[ia].doc_id == items[ib].doc_id {
                        continue;
                    }
                    let (gid_a, gid_b) = canonical_pair(items[ia].gid, items[ib].gid);
                    let ham = hamming(items[ia].sig, items[ib].sig);
                    if ham <= sim_hamming_moderate {
                        local.push((gid_a, gid_b, ham));
                    }
                }
            }
            (bucket_idx, local)
        })
        .collect();
    indexed.sort_by_key(|(i, _)| *i);

    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut out = Vec::new();
    for (_, candidates) in indexed {
        for (gid_a, gid_b, hamming_dist) in candidates {
            if seen.insert((gid_a, gid_b)) {
                out.push(SimPair {
                    gid_a,
                    gid_b,
                    hamming: hamming_dist,
                });
            }
        }
    }
    out.sort_by_key(|p| (p.gid_a, p.gid_b));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedup_core::simhash64;

    fn item(gid: u32, doc_id: u32, norm: &str) -> SentenceItem {
        SentenceItem {
            gid,
            doc_id,
            sent_id: gid,
            raw: norm.to_string(),
            norm: norm.to_string(),
            sig: simhash64(norm, 3),
        }
    }

    #[test]
    fn identical_text_has_zero_hamming() {
        let items = vec![item(0, 0, "the quick brown fox"), item(1, 1, "the quick brown fox")];
        let pairs = lsh_pairs(&items, 8);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].hamming, 0);
    }

    #[test]
    fn same_document_pairs_excluded() {
        let items = vec![item(0, 0, "the quick brown fox"), item(1, 0, "the quick brown fox")];
        assert!(lsh_pairs(&items, 8).is_empty());
    }

    #[test]
    fn above_threshold_pairs_excluded() {
        let items = vec![item(0, 0, "alpha bravo charlie delta"), item(1, 1, "zulu yankee xray whiskey")];
        let pairs = lsh_pairs(&items, 0);
        assert!(pairs.is_empty());
    }

    #[test]
    fn dedups_pair_seen_across_multiple_bands() {
        let items = vec![item(0, 0, "repeated phrase here"), item(1, 1, "repeated phrase here")];
        let pairs = lsh_pairs(&items, 64);
        // Identical signatures collide in all 8 bands; must still yield one pair.
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn output_is_sorted_by_gid() {
        let items = vec![
            item(0, 0, "aaa bbb ccc"),
            item(1, 1, "aaa bbb ccc"),
            item(2, 2, "aaa bbb ccc"),
        ];
        let pairs = lsh_pairs(&items, 64);
        let mut sorted = pairs.clone();
        sorted.sort_by_key(|p| (p.gid_a, p.gid_b));
        assert_eq!(pairs, sorted);
    }
}
