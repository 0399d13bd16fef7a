pub mod embed;
pub mod exact;
pub mod lsh;
pub mod pairgen;

pub use embed::{embed_pairs, EmbedError, Embedder, HashingEmbedder};
pub use exact::exact_pairs;
pub use lsh::lsh_pairs;
pub use pairgen::{
    matched_gids, sort_embed_for_emission, sort_simhash_for_emission, union_edges, Channels, Edge,
};
