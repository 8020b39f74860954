//! Indexing structures for nearest-match search
//!
//! - N-gram index: inverted index from gram to document ids
//! - Thread-safe wrapper: concurrent reads with serialized appends

pub mod ngram_index;
pub mod threadsafe;

pub use ngram_index::*;
pub use threadsafe::*;
