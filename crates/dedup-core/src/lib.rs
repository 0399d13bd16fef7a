pub mod error;
pub mod model;
pub mod normalize;
pub mod sentence;
pub mod signature;

pub use error::*;
pub use model::*;
pub use normalize::normalize_sentence;
pub use sentence::split_sentences;
pub use signature::{bands64, hamming, md5_64, simhash64, tokenize_words};
