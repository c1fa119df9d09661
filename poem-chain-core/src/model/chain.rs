use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::debug;

use super::word_state::{Token, WordState};

/// The full first-order word chain built from a training corpus.
///
/// The `Chain` maps every token that has appeared (as a word or as
/// `Token::Start`) to its `WordState`, which records how often each word was
/// observed following it.
///
/// # Responsibilities
/// - Build the model from pre-tokenized sentences
/// - Accumulate transition counts for each state
/// - Merge with another chain (parallel learning support)
/// - Expose read-only state lookups for the sampler
///
/// # Invariants
/// - `Token::Start` is always present as a key
/// - Every sentence-final word is present as a key, possibly with an empty
///   transition table (this is what lets a walk terminate)
/// - All transition counts are >= 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
	/// Mapping from a token to its corresponding state.
	states: HashMap<Token, WordState>,
}

impl Default for Chain {
	/// Returns an empty chain containing only the `Start` state.
	///
	/// Seeding `Start` guarantees a walk can always begin: on an untrained
	/// chain it terminates immediately with an empty sequence.
	fn default() -> Self {
		let mut states = HashMap::new();
		states.insert(Token::Start, WordState::new(Token::Start));
		Self { states }
	}
}

impl Chain {
	/// Adds one pre-tokenized sentence to the chain.
	///
	/// # Behavior
	/// - Walks the sentence left to right with `previous` starting at
	///   `Token::Start`, incrementing `states[previous][word]` for each word.
	/// - After the last word, ensures `previous` exists as a key (creating an
	///   empty state if needed), recording that this word can end a sequence.
	/// - An empty sentence contributes no transition; the `Start` state is
	///   left in place.
	///
	/// # Notes
	/// - Deterministic: no randomness, no side effects beyond `self`.
	/// - Any sequence of words is accepted, including an empty one.
	pub fn add_sentence<S: AsRef<str>>(&mut self, words: &[S]) {
		let mut previous = Token::Start;

		for word in words {
			let word = word.as_ref();
			let state = self
				.states
				.entry(previous.clone())
				.or_insert_with(|| WordState::new(previous.clone()));
			state.add_transition(word);
			previous = Token::word(word);
		}

		// The last word is not followed by anything; it must still be a key
		// so a walk reaching it can stop there.
		self.states
			.entry(previous.clone())
			.or_insert_with(|| WordState::new(previous));
	}

	/// Builds a chain from an ordered corpus of pre-tokenized sentences.
	///
	/// Deterministic given the input order: building twice from the same
	/// corpus yields identical chains.
	pub fn from_sentences<S: AsRef<str>>(sentences: &[Vec<S>]) -> Self {
		let mut chain = Self::default();
		for sentence in sentences {
			chain.add_sentence(sentence);
		}
		debug!(
			"built chain: {} states from {} sentences",
			chain.len(),
			sentences.len()
		);
		chain
	}

	/// Builds a chain from a corpus using multiple threads.
	///
	/// # Behavior
	/// - Splits the sentences into chunks (based on CPU cores * factor).
	/// - Spawns threads to build partial chains for each chunk.
	/// - Merges all partial chains sequentially.
	///
	/// The result equals the sequential build: transition counts are summed
	/// commutatively, so the merge order does not matter.
	///
	/// # Errors
	/// Returns an error if merging partial chains fails (cannot happen for
	/// chains built through `add_sentence`; kept for contract clarity).
	///
	/// # Notes
	/// - Uses MPSC channels to collect partial chains from threads.
	pub fn from_sentences_parallel(sentences: &[Vec<String>]) -> Result<Self, String> {
		if sentences.is_empty() {
			return Ok(Self::default());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = ((sentences.len() + chunks - 1) / chunks).max(1);

		let (tx, rx) = mpsc::channel();
		for chunk in sentences.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<Vec<String>> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial_chain = Chain::default();
				for sentence in &chunk {
					partial_chain.add_sentence(sentence);
				}
				tx.send(partial_chain).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut final_chain = Chain::default();
		for partial_chain in rx.iter() {
			final_chain.merge(&partial_chain)?;
		}

		debug!(
			"built chain in parallel: {} states from {} sentences over {} cpus",
			final_chain.len(),
			sentences.len(),
			cpus
		);
		Ok(final_chain)
	}

	/// Merges another chain into this one.
	///
	/// # Behavior
	/// - Matching states have their transition counts summed.
	/// - States missing from `self` are cloned over.
	///
	/// # Errors
	/// Returns an error on a per-state key mismatch (an internal invariant
	/// violation; states are merged under their own keys).
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}

	/// Looks up the state for a token.
	///
	/// Returns `None` for tokens never observed in the corpus.
	pub fn state(&self, token: &Token) -> Option<&WordState> {
		self.states.get(token)
	}

	/// Number of states in the chain (including `Start`).
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// True if the chain holds no trained transitions at all.
	pub fn is_empty(&self) -> bool {
		self.states.len() <= 1 && self.states.values().all(|s| !s.has_next())
	}
}
