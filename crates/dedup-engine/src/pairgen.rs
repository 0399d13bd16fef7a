//! Pair Generator (C7): the thin joiner over the three channel outputs.
//!
//! Feeds a stable-sorted pair list per channel/stratum to the artifact
//! writer, and unions `(sent_id_a, sent_id_b)` per document pair for the
//! block merger.

use std::collections::{BTreeMap, BTreeSet};

use dedup_core::{EmbedPair, ExactPair, SentenceItem, SimPair};

/// All three channels' moderate-stratum pair sets for one run.
#[derive(Debug, Default, Clone)]
pub struct Channels {
    pub exact: Vec<ExactPair>,
    pub simhash_moderate: Vec<SimPair>,
    pub embed_moderate: Vec<EmbedPair>,
}

impl Channels {
    /// SimHash pairs with `hamming <= strict`.
    pub fn simhash_strict(&self, strict: u32) -> Vec<SimPair> {
        self.simhash_moderate
            .iter()
            .copied()
            .filter(|p| p.hamming <= strict)
            .collect()
    }

    /// Embedding pairs with `cosine >= strict`.
    pub fn embed_strict(&self, strict: f32) -> Vec<EmbedPair> {
        self.embed_moderate
            .iter()
            .copied()
            .filter(|p| p.cosine >= strict)
            .collect()
    }
}

/// Sentence-id edge, oriented so the lower `doc_id` is always first.
pub type Edge = (u32, u32);

/// Union all three channels into a per-document-pair set of sentence-id
/// edges, with `(sent_id_a, sent_id_b)` oriented to document order.
///
/// Keyed by `(doc_a, doc_b)` with `doc_a < doc_b`.
pub fn union_edges(
    items: &[SentenceItem],
    channels: &Channels,
) -> BTreeMap<(u32, u32), BTreeSet<Edge>> {
    let by_gid: BTreeMap<u32, &SentenceItem> = items.iter().map(|it| (it.gid, it)).collect();
    let mut edges: BTreeMap<(u32, u32), BTreeSet<Edge>> = BTreeMap::new();

    let mut add = |gid_a: u32, gid_b: u32| {
        let a = by_gid[&gid_a];
        let b = by_gid[&gid_b];
        if a.doc_id == b.doc_id {
            return;
        }
        let ((da, sa), (db, sb)) = if a.doc_id < b.doc_id {
            ((a.doc_id, a.sent_id), (b.doc_id, b.sent_id))
        } else {
            ((b.doc_id, b.sent_id), (a.doc_id, a.sent_id))
        };
        edges.entry((da, db)).or_default().insert((sa, sb));
    };

    for p in &channels.exact {
        add(p.gid_a, p.gid_b);
    }
    for p in &channels.simhash_moderate {
        add(p.gid_a, p.gid_b);
    }
    for p in &channels.embed_moderate {
        add(p.gid_a, p.gid_b);
    }

    edges
}

/// Stable emission order for the SimHash CSVs: ascending Hamming distance,
/// then ascending `(doc_id_a, doc_id_b)` — matches the reference writer's
/// `sorted(sim_pairs, key=lambda x: (x[2], doc_id_a, doc_id_b))`.
pub fn sort_simhash_for_emission(items: &[SentenceItem], pairs: &[SimPair]) -> Vec<SimPair> {
    let doc_of = doc_by_gid(items);
    let mut out = pairs.to_vec();
    out.sort_by_key(|p| (p.hamming, doc_of[&p.gid_a], doc_of[&p.gid_b]));
    out
}

/// Stable emission order for the embedding CSVs: descending cosine, then
/// ascending `(doc_id_a, doc_id_b)` — matches the reference writer's
/// `sorted(embed_pairs, key=lambda x: (-x[2], doc_id_a, doc_id_b))`.
pub fn sort_embed_for_emission(items: &[SentenceItem], pairs: &[EmbedPair]) -> Vec<EmbedPair> {
    let doc_of = doc_by_gid(items);
    let mut out = pairs.to_vec();
    out.sort_by(|a, b| {
        b.cosine
            .partial_cmp(&a.cosine)
            .unwrap()
            .then((doc_of[&a.gid_a], doc_of[&a.gid_b]).cmp(&(doc_of[&b.gid_a], doc_of[&b.gid_b])))
    });
    out
}

fn doc_by_gid(items: &[SentenceItem]) -> BTreeMap<u32, u32> {
    items.iter().map(|it| (it.gid, it.doc_id)).collect()
}

/// Every gid that appears in any channel — feeds `matched_sentences_any`.
pub fn matched_gids(channels: &Channels) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    for p in &channels.exact {
        out.insert(p.gid_a);
        out.insert(p.gid_b);
    }
    for p in &channels.simhash_moderate {
        out.insert(p.gid_a);
        out.insert(p.gid_b);
    }
    for p in &channels.embed_moderate {
        out.insert(p.gid_a);
        out.insert(p.gid_b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(gid: u32, doc_id: u32, sent_id: u32) -> SentenceItem {
        SentenceItem {
            gid,
            doc_id,
            sent_id,
            raw: String::new(),
            norm: String::new(),
            sig: 0,
        }
    }

    #[test]
    fn simhash_strict_is_subset_of_moderate() {
        let channels = Channels {
            exact: vec![],
            simhash_moderate: vec![
                SimPair { gid_a: 0, gid_b: 1, hamming: 2 },
                SimPair { gid_a: 2, gid_b: 3, hamming: 7 },
            ],
            embed_moderate: vec![],
        };
        let strict = channels.simhash_strict(6);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].hamming, 2);
    }

    #[test]
    fn embed_strict_is_subset_of_moderate() {
        let channels = Channels {
            exact: vec![],
            simhash_moderate: vec![],
            embed_moderate: vec![
                EmbedPair { gid_a: 0, gid_b: 1, cosine: 0.95 },
                EmbedPair { gid_a: 2, gid_b: 3, cosine: 0.89 },
            ],
        };
        let strict = channels.embed_strict(0.90);
        assert_eq!(strict.len(), 1);
        assert!(strict[0].cosine >= 0.90);
    }

    #[test]
    fn union_edges_orients_by_document_order() {
        let items = vec![item(0, 1, 5), item(1, 0, 3)];
        let channels = Channels {
            exact: vec![ExactPair { gid_a: 0, gid_b: 1 }],
            simhash_moderate: vec![],
            embed_moderate: vec![],
        };
        let edges = union_edges(&items, &channels);
        let set = edges.get(&(0, 1)).unwrap();
        assert!(set.contains(&(3, 5)));
    }

    #[test]
    fn union_edges_excludes_same_document() {
        let items = vec![item(0, 0, 0), item(1, 0, 1)];
        let channels = Channels {
            exact: vec![ExactPair { gid_a: 0, gid_b: 1 }],
            simhash_moderate: vec![],
            embed_moderate: vec![],
        };
        assert!(union_edges(&items, &channels).is_empty());
    }

    #[test]
    fn sort_simhash_for_emission_orders_by_hamming_then_doc_ids() {
        let items = vec![item(0, 0, 0), item(1, 1, 0), item(2, 2, 0), item(3, 3, 0)];
        let pairs = vec![
            SimPair { gid_a: 2, gid_b: 3, hamming: 1 },
            SimPair { gid_a: 0, gid_b: 1, hamming: 4 },
        ];
        let sorted = sort_simhash_for_emission(&items, &pairs);
        assert_eq!(sorted[0].hamming, 1);
        assert_eq!(sorted[1].hamming, 4);
    }

    #[test]
    fn sort_embed_for_emission_orders_by_descending_cosine() {
        let items = vec![item(0, 0, 0), item(1, 1, 0), item(2, 2, 0), item(3, 3, 0)];
        let pairs = vec![
            EmbedPair { gid_a: 0, gid_b: 1, cosine: 0.80 },
            EmbedPair { gid_a: 2, gid_b: 3, cosine: 0.95 },
        ];
        let sorted = sort_embed_for_emission(&items, &pairs);
        assert_eq!(sorted[0].cosine, 0.95);
        assert_eq!(sorted[1].cosine, 0.80);
    }

    #[test]
    fn matched_gids_unions_all_channels() {
        let channels = Channels {
            exact: vec![ExactPair { gid_a: 0, gid_b: 1 }],
            simhash_moderate: vec![SimPair { gid_a: 2, gid_b: 3, hamming: 1 }],
            embed_moderate: vec![EmbedPair { gid_a: 4, gid_b: 5, cosine: 0.9 }],
        };
        let gids = matched_gids(&channels);
        assert_eq!(gids.len(), 6);
    }
}
