//! First-order word-chain generation library.
//!
//! This crate builds a Markov chain over whitespace-tokenized words and
//! samples new word sequences from it:
//! - Frequency-table chain construction from pre-tokenized sentences
//! - Weighted-random walks from a start marker to a terminal word
//! - Multithreaded chain construction and batch generation
//!
//! Text acquisition (CSV/file reading, cleanup filters) and output
//! formatting (line breaks, truncation, saving) are left to callers: the
//! library consumes sentences and produces word sequences, nothing else.

/// Core chain model and generation logic.
pub mod model;
