use std::collections::HashMap;
use std::fmt;

use rand::Rng;

/// Identifier of a state in the word chain.
///
/// The start of every sentence is marked by the dedicated `Start` variant
/// rather than a reserved string, so no word appearing in a corpus can ever
/// collide with the sentence-start marker. `Start` is never recorded as a
/// successor of anything.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
	/// The sentence-start marker. Every walk begins here.
	Start,
	/// A whitespace-delimited word observed in the corpus.
	Word(String),
}

impl Token {
	/// Builds a word token from anything string-like.
	pub fn word<S: Into<String>>(word: S) -> Self {
		Token::Word(word.into())
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Start => write!(f, "<start>"),
			Token::Word(w) => write!(f, "{}", w),
		}
	}
}

/// Represents a single state of the word chain.
///
/// A `WordState` corresponds to one token (`key`) and stores all observed
/// transitions from this token to the word that followed it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Predict the next word using weighted random sampling
/// - Merge with another state having the same key (parallel learning support)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - Successors are always words, never `Token::Start`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordState {
	/// Identifier of the state.
	key: Token,
	/// Outgoing transitions indexed by the next word.
	/// The value represents how many times this transition was observed.
	/// Example: { "friend" => 2, "voice" => 1 }
	transitions: HashMap<String, usize>,
}

impl WordState {
	/// Creates a new empty state for the given token.
	pub fn new(key: Token) -> Self {
		Self {
			key,
			transitions: HashMap::new(),
		}
	}

	/// Returns the token this state belongs to.
	pub fn key(&self) -> &Token {
		&self.key
	}

	/// Records an occurrence of a transition toward `next_word`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition<S: Into<String>>(&mut self, next_word: S) {
		*self.transitions.entry(next_word.into()).or_insert(0) += 1;
	}

	/// True if at least one word has been observed following this one.
	///
	/// A state with no transitions is a terminal state; reaching it is the
	/// designed end of a walk, not a fault.
	pub fn has_next(&self) -> bool {
		!self.transitions.is_empty()
	}

	/// Total number of recorded occurrences across all transitions.
	///
	/// Equals the number of times this token was immediately followed by a
	/// word anywhere in the corpus.
	pub fn total_occurrences(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Read-only view of the transition table.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(w, c)| (w.as_str(), *c))
	}

	/// Predicts the next word using weighted random sampling.
	///
	/// The probability of selecting a word is proportional to its occurrence
	/// count. Weights are static: drawing a word does not consume it.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict(&self) -> Option<&str> {
		if self.transitions.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total: usize = self.total_occurrences();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		// Randomly select a word
		let mut r = rand::rng().random_range(0..total);

		let mut fallback: Option<&str> = None;
		for (next_word, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_word);
			}
			r -= occurrence;
			fallback = Some(next_word);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same token (`key`).
	/// Transition occurrence counts are summed.
	///
	/// This method is intended for parallel learning, where multiple partial
	/// chains are combined into a single one.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err("Key mismatch".to_owned());
		}

		for (next_word, occurrence) in &other.transitions {
			*self.transitions.entry(next_word.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_state_is_terminal() {
		let state = WordState::new(Token::Start);
		assert!(!state.has_next());
		assert_eq!(state.predict(), None);
		assert_eq!(state.total_occurrences(), 0);
	}

	#[test]
	fn counts_accumulate_per_successor() {
		let mut state = WordState::new(Token::word("hello"));
		state.add_transition("there");
		state.add_transition("my");
		state.add_transition("there");

		assert!(state.has_next());
		assert_eq!(state.total_occurrences(), 3);
		let counts: std::collections::HashMap<_, _> = state.transitions().collect();
		assert_eq!(counts["there"], 2);
		assert_eq!(counts["my"], 1);
	}

	#[test]
	fn predict_only_returns_recorded_successors() {
		let mut state = WordState::new(Token::Start);
		state.add_transition("hello");
		state.add_transition("goodbye");

		for _ in 0..100 {
			let next = state.predict().unwrap();
			assert!(next == "hello" || next == "goodbye");
		}
	}

	#[test]
	fn predict_with_single_successor_is_deterministic() {
		let mut state = WordState::new(Token::word("there"));
		state.add_transition("friend");
		for _ in 0..10 {
			assert_eq!(state.predict(), Some("friend"));
		}
	}

	#[test]
	fn merge_sums_occurrences() {
		let mut a = WordState::new(Token::word("hello"));
		a.add_transition("there");
		let mut b = WordState::new(Token::word("hello"));
		b.add_transition("there");
		b.add_transition("my");

		a.merge(&b).unwrap();
		let counts: std::collections::HashMap<_, _> = a.transitions().collect();
		assert_eq!(counts["there"], 2);
		assert_eq!(counts["my"], 1);
	}

	#[test]
	fn merge_rejects_key_mismatch() {
		let mut a = WordState::new(Token::word("hello"));
		let b = WordState::new(Token::word("goodbye"));
		assert!(a.merge(&b).is_err());
	}
}
