// Corpus deduplication engine: exact, near-duplicate and reused-passage
// detection across a directory of word-processing documents.
//
// Usage:
//   dedup-cli ./corpus ./out
//   dedup-cli ./corpus ./out --use-embeddings

mod discover;
mod error;
mod extract;
mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dedup_core::{Document, Params, SentenceItem};
use dedup_engine::{
    embed_pairs, exact_pairs, lsh_pairs, matched_gids, sort_embed_for_emission,
    sort_simhash_for_emission, union_edges, Channels, HashingEmbedder,
};
use dedup_merge::{doc_metrics, merge_blocks, Summary};

use error::{exit_code, CliError};
use output::Lookup;

#[derive(Parser)]
#[command(
    name = "dedup-cli",
    about = "Corpus deduplication engine: sentence-level exact/near-duplicate/reused-passage detection",
    version = env!("CARGO_PKG_VERSION"),
)]
struct Cli {
    #[arg(help = "Directory to recursively scan for .docx files")]
    input_dir: PathBuf,

    #[arg(help = "Directory the CSV/JSON artifacts are written into")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = 8, help = "Minimum words for a sentence to be kept")]
    min_sentence_words: usize,

    #[arg(long, default_value_t = 3, help = "Word n-gram width for SimHash features")]
    sim_ngram: usize,

    #[arg(long, default_value_t = 6, help = "Strict-stratum Hamming threshold")]
    sim_hamming_strict: u32,

    #[arg(long, default_value_t = 8, help = "Moderate-stratum Hamming threshold")]
    sim_hamming_moderate: u32,

    #[arg(long, help = "Enable the embedding near-duplicate channel")]
    use_embeddings: bool,

    #[arg(long, default_value = "sentence-transformers/all-MiniLM-L6-v2", help = "Opaque embedder model identifier")]
    embed_model: String,

    #[arg(long, default_value_t = 0.90, help = "Strict-stratum cosine threshold")]
    embed_threshold_strict: f32,

    #[arg(long, default_value_t = 0.88, help = "Moderate-stratum cosine threshold")]
    embed_threshold_moderate: f32,

    #[arg(long, default_value_t = 8, help = "Embedding neighbor count, including self")]
    topk: usize,

    #[arg(long, default_value_t = 2, help = "Minimum consecutive-sentence run length to emit as a block")]
    block_min_run: u32,
}

impl Cli {
    fn params(&self) -> Params {
        Params {
            min_sentence_words: self.min_sentence_words,
            sim_ngram: self.sim_ngram,
            sim_hamming_strict: self.sim_hamming_strict,
            sim_hamming_moderate: self.sim_hamming_moderate,
            use_embeddings: self.use_embeddings,
            embed_model: self.embed_model.clone(),
            embed_threshold_strict: self.embed_threshold_strict,
            embed_threshold_moderate: self.embed_threshold_moderate,
            topk: self.topk,
            block_min_run: self.block_min_run,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("dedup_cli=info".parse().unwrap()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => {}
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(exit_code(&err));
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let params = cli.params();
    std::fs::create_dir_all(&cli.output_dir)?;

    let paths = discover::discover_paths(&cli.input_dir)?;
    info!("discovered {} candidate document(s)", paths.len());

    // doc_id is assigned densely, in discovery order, only to documents that
    // survive extraction — a parse failure receives no doc_id (§7).
    let mut documents: Vec<Document> = Vec::new();
    let mut items: Vec<SentenceItem> = Vec::new();
    let mut next_gid: u32 = 0;

    for path in paths {
        let text = match extract::extract_text(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                continue;
            }
        };

        let doc_id = documents.len() as u32;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(Document { doc_id, name, path });

        let mut sent_id: u32 = 0;
        for raw in dedup_core::split_sentences(&text) {
            let norm = dedup_core::normalize_sentence(&raw);
            if dedup_core::tokenize_words(&norm).len() < params.min_sentence_words {
                continue;
            }
            let sig = dedup_core::simhash64(&norm, params.sim_ngram);
            items.push(SentenceItem {
                gid: next_gid,
                doc_id,
                sent_id,
                raw,
                norm,
                sig,
            });
            next_gid += 1;
            sent_id += 1;
        }
    }
    info!(
        "kept {} sentence(s) (>= {} words)",
        items.len(),
        params.min_sentence_words
    );

    let exact = exact_pairs(&items);
    let simhash_moderate = lsh_pairs(&items, params.sim_hamming_moderate);

    let embed_moderate = if params.use_embeddings {
        match embed_pairs(&items, &HashingEmbedder, params.topk, params.embed_threshold_moderate) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!("embedder unavailable, disabling embedding channel: {e}");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let channels = Channels { exact, simhash_moderate, embed_moderate };
    let simhash_strict = channels.simhash_strict(params.sim_hamming_strict);
    let embed_strict = channels.embed_strict(params.embed_threshold_strict);

    let edges = union_edges(&items, &channels);
    let (blocks, in_block) = merge_blocks(&edges, params.block_min_run);
    let matched = matched_gids(&channels);
    let metrics = doc_metrics(&documents, &items, &matched, &in_block);

    let simhash_moderate_sorted = sort_simhash_for_emission(&items, &channels.simhash_moderate);
    let simhash_strict_sorted = sort_simhash_for_emission(&items, &simhash_strict);
    let embed_moderate_sorted = sort_embed_for_emission(&items, &channels.embed_moderate);
    let embed_strict_sorted = sort_embed_for_emission(&items, &embed_strict);

    let lookup = Lookup::new(&documents, &items);
    output::write_exact_pairs(&cli.output_dir.join("exact_sentence_pairs.csv"), &channels.exact, &lookup)?;
    output::write_sim_pairs(&cli.output_dir.join("simhash_sentence_pairs.csv"), &simhash_moderate_sorted, &lookup)?;
    output::write_sim_pairs(&cli.output_dir.join("simhash_sentence_pairs_strict.csv"), &simhash_strict_sorted, &lookup)?;
    output::write_embed_pairs(&cli.output_dir.join("embed_sentence_pairs.csv"), &embed_moderate_sorted, &lookup)?;
    output::write_embed_pairs(&cli.output_dir.join("embed_sentence_pairs_strict.csv"), &embed_strict_sorted, &lookup)?;
    output::write_blocks(&cli.output_dir.join("block_matches.csv"), &blocks, &documents)?;
    output::write_doc_metrics(&cli.output_dir.join("doc_metrics.csv"), &metrics)?;

    let summary = Summary {
        n_documents: documents.len(),
        n_sentences_kept: items.len(),
        exact_pairs: channels.exact.len(),
        simhash_pairs_moderate: channels.simhash_moderate.len(),
        simhash_pairs_strict: simhash_strict.len(),
        embed_pairs_moderate: channels.embed_moderate.len(),
        embed_pairs_strict: embed_strict.len(),
        block_matches: blocks.len(),
        params,
        docs: documents.iter().map(|d| d.name.clone()).collect(),
    };
    output::write_summary(&cli.output_dir.join("summary.json"), &summary)?;

    info!("wrote artifacts to {}", cli.output_dir.display());
    Ok(())
}
