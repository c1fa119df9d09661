//! Top-level module for the word-chain generation system.
//!
//! This crate provides a first-order word-level Markov generator, including:
//! - The trained chain itself (`Chain`)
//! - Per-token state management (`Token`, `WordState`)
//! - Generation configuration (`GenerationInput`)
//! - A high-level sampling interface (`Sampler`)

/// The full predecessor/successor-frequency model.
///
/// Handles sentence ingestion, transition counting, sequential and
/// multithreaded construction, and chain merging.
pub mod chain;

/// Generation parameter structure.
///
/// Stores the walk step cap and the empty-output retry budget.
/// Constructed through `Sampler::make_generation_input`.
pub mod generation_input;

/// High-level interface for sampling word sequences from a chain.
///
/// Exposes single-threaded and multithreaded batch generation and the
/// walk error taxonomy.
pub mod sampler;

/// Representation of a single chain state.
///
/// Holds the state identifier (`Token`) and its outgoing transitions, and
/// supports weighted random sampling of the next word.
pub mod word_state;
