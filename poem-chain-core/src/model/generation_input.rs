/// Input parameters for generating word sequences from a chain.
///
/// `GenerationInput` contains the configuration knobs of a generation
/// session: the walk step cap and the empty-output retry budget.
///
/// # Responsibilities
/// - Bound the length of a single walk (`max_steps`)
/// - Control how many times an empty walk is retried (`nb_try`)
///
/// # Invariants
/// - `max_steps == 0` disables the cap entirely; any other value bounds the
///   number of transitions taken by one walk
pub struct GenerationInput {
	/// Maximum number of transitions taken by a single walk.
	///
	/// A chain can contain a cycle with no path to a terminal state (a word
	/// whose only successor is itself); the cap turns such a walk into a
	/// `WalkDidNotTerminate` error instead of a hang. 0 disables the cap.
	pub max_steps: usize,

	/// Number of attempts to retry a walk that produced an empty sequence.
	///
	/// An empty sequence is still a valid result once the attempts are
	/// spent (an untrained chain can produce nothing else).
	pub nb_try: usize,
}

/// Default walk step cap.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

impl GenerationInput {
	/// Creates a `GenerationInput` with default parameters.
	///
	/// # Visibility
	/// - `pub(crate)` to prevent construction outside the crate; use
	///   `Sampler::make_generation_input`.
	pub(crate) fn new() -> Self {
		Self {
			max_steps: DEFAULT_MAX_STEPS,
			nb_try: 0,
		}
	}
}
