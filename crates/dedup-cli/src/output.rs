//! Artifact Writer (C13): emit the documented CSV/JSON files into the output
//! directory.
//!
//! CSV rows are written via `serde`-derived structs so column names and
//! order match the header exactly; an empty pair set still writes a
//! header-only file (required when embeddings are disabled).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use dedup_core::{Document, EmbedPair, ExactPair, SentenceItem, SimPair};
use dedup_merge::{DocMetrics, Summary};

use crate::error::CliError;

fn truncate_240(s: &str) -> String {
    match s.char_indices().nth(240) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

#[derive(Serialize)]
struct PairRow<'a> {
    #[serde(rename = "docA")]
    doc_a: &'a str,
    #[serde(rename = "sentA_id")]
    sent_a_id: u32,
    #[serde(rename = "textA")]
    text_a: String,
    #[serde(rename = "docB")]
    doc_b: &'a str,
    #[serde(rename = "sentB_id")]
    sent_b_id: u32,
    #[serde(rename = "textB")]
    text_b: String,
}

#[derive(Serialize)]
struct SimPairRow<'a> {
    #[serde(rename = "docA")]
    doc_a: &'a str,
    #[serde(rename = "sentA_id")]
    sent_a_id: u32,
    #[serde(rename = "textA")]
    text_a: String,
    #[serde(rename = "docB")]
    doc_b: &'a str,
    #[serde(rename = "sentB_id")]
    sent_b_id: u32,
    #[serde(rename = "textB")]
    text_b: String,
    hamming: u32,
}

#[derive(Serialize)]
struct EmbedPairRow<'a> {
    #[serde(rename = "docA")]
    doc_a: &'a str,
    #[serde(rename = "sentA_id")]
    sent_a_id: u32,
    #[serde(rename = "textA")]
    text_a: String,
    #[serde(rename = "docB")]
    doc_b: &'a str,
    #[serde(rename = "sentB_id")]
    sent_b_id: u32,
    #[serde(rename = "textB")]
    text_b: String,
    cosine: f32,
}

#[derive(Serialize)]
struct BlockRow<'a> {
    #[serde(rename = "docA")]
    doc_a: &'a str,
    #[serde(rename = "A_start")]
    a_start: u32,
    #[serde(rename = "A_end")]
    a_end: u32,
    len_sent: u32,
    #[serde(rename = "docB")]
    doc_b: &'a str,
    #[serde(rename = "B_start")]
    b_start: u32,
    #[serde(rename = "B_end")]
    b_end: u32,
}

/// Index of sentence items and documents used to resolve gids/doc_ids into
/// the names and raw text the CSV rows need.
pub struct Lookup<'a> {
    by_gid: BTreeMap<u32, &'a SentenceItem>,
    doc_names: BTreeMap<u32, &'a str>,
}

impl<'a> Lookup<'a> {
    pub fn new(documents: &'a [Document], items: &'a [SentenceItem]) -> Self {
        Lookup {
            by_gid: items.iter().map(|it| (it.gid, it)).collect(),
            doc_names: documents.iter().map(|d| (d.doc_id, d.name.as_str())).collect(),
        }
    }

    fn row(&self, gid_a: u32, gid_b: u32) -> (&'a str, u32, String, &'a str, u32, String) {
        let a = self.by_gid[&gid_a];
        let b = self.by_gid[&gid_b];
        (
            self.doc_names[&a.doc_id],
            a.sent_id,
            truncate_240(&a.raw),
            self.doc_names[&b.doc_id],
            b.sent_id,
            truncate_240(&b.raw),
        )
    }
}

pub fn write_exact_pairs(path: &Path, pairs: &[ExactPair], lookup: &Lookup) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(path)?;
    for p in pairs {
        let (doc_a, sent_a_id, text_a, doc_b, sent_b_id, text_b) = lookup.row(p.gid_a, p.gid_b);
        w.serialize(PairRow { doc_a, sent_a_id, text_a, doc_b, sent_b_id, text_b })?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_sim_pairs(path: &Path, pairs: &[SimPair], lookup: &Lookup) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(path)?;
    for p in pairs {
        let (doc_a, sent_a_id, text_a, doc_b, sent_b_id, text_b) = lookup.row(p.gid_a, p.gid_b);
        w.serialize(SimPairRow {
            doc_a,
            sent_a_id,
            text_a,
            doc_b,
            sent_b_id,
            text_b,
            hamming: p.hamming,
        })?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_embed_pairs(path: &Path, pairs: &[EmbedPair], lookup: &Lookup) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(path)?;
    for p in pairs {
        let (doc_a, sent_a_id, text_a, doc_b, sent_b_id, text_b) = lookup.row(p.gid_a, p.gid_b);
        w.serialize(EmbedPairRow {
            doc_a,
            sent_a_id,
            text_a,
            doc_b,
            sent_b_id,
            text_b,
            cosine: (p.cosine * 10000.0).round() / 10000.0,
        })?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_blocks(path: &Path, blocks: &[dedup_core::Block], documents: &[Document]) -> Result<(), CliError> {
    let names: BTreeMap<u32, &str> = documents.iter().map(|d| (d.doc_id, d.name.as_str())).collect();
    let mut w = csv::Writer::from_path(path)?;
    for b in blocks {
        w.serialize(BlockRow {
            doc_a: names[&b.doc_a],
            a_start: b.a_start,
            a_end: b.a_end,
            len_sent: b.len,
            doc_b: names[&b.doc_b],
            b_start: b.b_start,
            b_end: b.b_end,
        })?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_doc_metrics(path: &Path, metrics: &[DocMetrics]) -> Result<(), CliError> {
    let mut w = csv::Writer::from_path(path)?;
    for m in metrics {
        w.serialize(m)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &Summary) -> Result<(), CliError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
