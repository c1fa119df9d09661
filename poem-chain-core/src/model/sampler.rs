use std::thread;

use log::warn;
use thiserror::Error;

use super::chain::Chain;
use super::generation_input::GenerationInput;
use super::word_state::Token;

/// Errors produced while walking a chain.
///
/// Reaching a terminal state is NOT an error: it is the designed end of a
/// walk. Only contract violations and runaway walks are reported here.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
	/// The walk reached a token absent from the chain.
	///
	/// This cannot happen when the walk only follows recorded transitions of
	/// a chain built through `Chain::add_sentence`; seeing it indicates a
	/// builder bug, so the walk fails fast instead of treating the token as
	/// terminal.
	#[error("unknown state '{0}' reached during walk")]
	UnknownState(Token),

	/// The walk exceeded the configured step cap without reaching a
	/// terminal state (see `GenerationInput::max_steps`).
	#[error("walk did not terminate after {steps} steps")]
	WalkDidNotTerminate { steps: usize },
}

/// High-level generator performing weighted-random walks over a chain.
///
/// # Responsibilities
/// - Walk the chain from `Start` to a terminal state, one sequence per walk
/// - Generate batches of independent sequences, optionally in parallel
/// - Retry empty outputs up to the configured budget
///
/// The chain is borrowed read-only: walks share no mutable state, which is
/// what makes the parallel batch safe without coordination.
#[derive(Debug)]
pub struct Sampler<'a> {
	chain: &'a Chain,
}

impl<'a> Sampler<'a> {
	/// Creates a sampler over a fully built chain.
	pub fn new(chain: &'a Chain) -> Self {
		Self { chain }
	}

	/// Creates a new `GenerationInput` with default parameters.
	pub fn make_generation_input(&self) -> GenerationInput {
		GenerationInput::new()
	}

	/// Performs one weighted-random walk.
	///
	/// # Behavior
	/// - Starts at `Token::Start` and repeatedly picks the next word by
	///   weighted random choice over the current state's transitions.
	/// - Every visited word is recorded, including the terminal one; only
	///   the leading `Start` is excluded.
	/// - Stops the moment a state with no successors is reached.
	///
	/// # Errors
	/// - `UnknownState` if a token has no state in the chain.
	/// - `WalkDidNotTerminate` if the step cap is exceeded.
	fn walk(&self, input: &GenerationInput) -> Result<Vec<String>, GenerateError> {
		let mut sentence: Vec<String> = Vec::new();
		let mut current = Token::Start;

		loop {
			let state = self
				.chain
				.state(&current)
				.ok_or_else(|| GenerateError::UnknownState(current.clone()))?;

			let next = match state.predict() {
				Some(next) => next,
				None => return Ok(sentence),
			};

			if input.max_steps != 0 && sentence.len() >= input.max_steps {
				warn!("walk truncated after {} steps", sentence.len());
				return Err(GenerateError::WalkDidNotTerminate {
					steps: sentence.len(),
				});
			}

			sentence.push(next.to_owned());
			current = Token::word(next);
		}
	}

	/// Generates one sequence, retrying empty outputs up to `nb_try` times.
	fn generate_one(&self, input: &GenerationInput) -> Result<Vec<String>, GenerateError> {
		let mut sentence = self.walk(input)?;
		let mut nb_try = input.nb_try;

		while sentence.is_empty() && nb_try > 0 {
			sentence = self.walk(input)?;
			nb_try -= 1;
		}

		Ok(sentence)
	}

	/// Generates `count` independent sequences.
	///
	/// Each sequence is one walk (plus empty-output retries); walks do not
	/// influence each other, the transition weights are static counts.
	pub fn generate(
		&self,
		input: &GenerationInput,
		count: usize,
	) -> Result<Vec<Vec<String>>, GenerateError> {
		let mut sentences = Vec::with_capacity(count);
		for _ in 0..count {
			sentences.push(self.generate_one(input)?);
		}
		Ok(sentences)
	}

	/// Generates `count` independent sequences using multiple threads.
	///
	/// # Behavior
	/// - Splits the batch into per-worker quotas (one worker per CPU, at
	///   most `count`).
	/// - Each worker walks the shared read-only chain on its own; no
	///   coordination is needed beyond collecting the results.
	///
	/// # Errors
	/// Same as `generate`; the first worker error is returned.
	pub fn generate_parallel(
		&self,
		input: &GenerationInput,
		count: usize,
	) -> Result<Vec<Vec<String>>, GenerateError> {
		if count == 0 {
			return Ok(Vec::new());
		}

		let workers = num_cpus::get().min(count);
		let quota = count / workers;
		let remainder = count % workers;

		thread::scope(|scope| {
			let mut handles = Vec::with_capacity(workers);
			for worker in 0..workers {
				// The first `remainder` workers take one extra walk
				let quota = quota + usize::from(worker < remainder);
				handles.push(scope.spawn(move || self.generate(input, quota)));
			}

			let mut sentences = Vec::with_capacity(count);
			for handle in handles {
				let batch = handle.join().expect("Failed to join generation thread")?;
				sentences.extend(batch);
			}
			Ok(sentences)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus(lines: &[&str]) -> Vec<Vec<String>> {
		lines
			.iter()
			.map(|l| l.split_whitespace().map(str::to_owned).collect())
			.collect()
	}

	#[test]
	fn generated_sequences_match_training_paths() {
		let chain = Chain::from_sentences(&corpus(&["hello there friend", "hello my friend"]));
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		let expected_a = vec!["hello".to_owned(), "there".to_owned(), "friend".to_owned()];
		let expected_b = vec!["hello".to_owned(), "my".to_owned(), "friend".to_owned()];

		for sentence in sampler.generate(&input, 50).unwrap() {
			assert!(
				sentence == expected_a || sentence == expected_b,
				"unexpected sequence: {:?}",
				sentence
			);
		}
	}

	#[test]
	fn single_word_corpus_always_yields_that_word() {
		let chain = Chain::from_sentences(&corpus(&["word"]));
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		for sentence in sampler.generate(&input, 20).unwrap() {
			assert_eq!(sentence, vec!["word".to_owned()]);
		}
	}

	#[test]
	fn empty_corpus_yields_empty_sequences() {
		let chain = Chain::from_sentences(&corpus(&[""]));
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		assert_eq!(sampler.generate(&input, 3).unwrap(), vec![Vec::<String>::new(); 3]);
	}

	#[test]
	fn empty_retries_still_yield_empty_on_untrained_chain() {
		let chain = Chain::default();
		let sampler = Sampler::new(&chain);
		let mut input = sampler.make_generation_input();
		input.nb_try = 5;

		assert_eq!(sampler.generate(&input, 1).unwrap(), vec![Vec::<String>::new()]);
	}

	#[test]
	fn terminal_word_is_included_and_start_excluded() {
		let chain = Chain::from_sentences(&corpus(&["one two"]));
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		let sentence = sampler.generate(&input, 1).unwrap().remove(0);
		assert_eq!(sentence, vec!["one".to_owned(), "two".to_owned()]);
	}

	#[test]
	fn acyclic_chain_terminates_without_cap() {
		let chain = Chain::from_sentences(&corpus(&["hello there friend", "hello my friend"]));
		let sampler = Sampler::new(&chain);
		let mut input = sampler.make_generation_input();
		input.max_steps = 0;

		for sentence in sampler.generate(&input, 20).unwrap() {
			assert_eq!(sentence.len(), 3);
		}
	}

	#[test]
	fn self_loop_is_reported_not_hung() {
		// "a" is always followed by "a": the walk can never reach a
		// terminal state.
		let chain = Chain::from_sentences(&corpus(&["a a a"]));
		let sampler = Sampler::new(&chain);
		let mut input = sampler.make_generation_input();
		input.max_steps = 16;

		assert_eq!(
			sampler.generate(&input, 1),
			Err(GenerateError::WalkDidNotTerminate { steps: 16 })
		);
	}

	#[test]
	fn generate_returns_requested_count() {
		let chain = Chain::from_sentences(&corpus(&["ho hum"]));
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		assert_eq!(sampler.generate(&input, 7).unwrap().len(), 7);
	}

	#[test]
	fn parallel_generation_matches_contract() {
		let chain = Chain::from_sentences(&corpus(&["hello there friend", "hello my friend"]));
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		let expected_a = vec!["hello".to_owned(), "there".to_owned(), "friend".to_owned()];
		let expected_b = vec!["hello".to_owned(), "my".to_owned(), "friend".to_owned()];

		let sentences = sampler.generate_parallel(&input, 33).unwrap();
		assert_eq!(sentences.len(), 33);
		for sentence in sentences {
			assert!(sentence == expected_a || sentence == expected_b);
		}
	}

	#[test]
	fn parallel_generation_of_zero_is_empty() {
		let chain = Chain::default();
		let sampler = Sampler::new(&chain);
		let input = sampler.make_generation_input();

		assert!(sampler.generate_parallel(&input, 0).unwrap().is_empty());
	}
}
