use thiserror::Error;

use super::state::State;

/// Errors reported by the Markov model.
///
/// None of these are retried internally; they propagate to the caller,
/// which decides whether to re-prompt, fall back or abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
	/// The model order must be at least 1.
	#[error("model order must be >= 1, got {0}")]
	InvalidOrder(usize),

	/// The training corpus is too short to form a single transition window.
	///
	/// Fatal to that training call; the caller must supply more data.
	#[error("at least {required} tokens are required to fit a model of order {order}, got {actual}")]
	InsufficientData {
		order: usize,
		required: usize,
		actual: usize,
	},

	/// A transition was requested from a state never observed in training.
	///
	/// Can surface mid-generation when the trailing window of the history
	/// was only ever seen as the final n-gram of the corpus.
	#[error("unknown state: {0}")]
	UnknownState(State),

	/// Generation was requested from a starting state absent from the model.
	#[error("unknown starting state: {0}")]
	UnknownStartState(State),

	/// No training state begins with the requested seed word.
	///
	/// A user-input error, distinct from [`ModelError::UnknownStartState`]:
	/// the caller never obtained a valid starting state at all.
	#[error("no state starts with the seed word {0:?}")]
	SeedNotFound(String),
}
