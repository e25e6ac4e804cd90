use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::ModelError;
use super::markov_model::MarkovModel;
use super::state::State;

/// Hard cap on the total number of tokens produced by one generation run,
/// seed tokens included.
pub const MAX_GENERATED_TOKENS: usize = 1000;

/// Parameters for a generation run.
///
/// # Responsibilities
/// - Carry the length cap (`max_len`, defaults to [`MAX_GENERATED_TOKENS`])
/// - Carry an optional deterministic rng seed for reproducible runs
///
/// # Notes
/// - Pacing between emitted tokens is deliberately absent: delays belong to
///   the consumer draining the stream, never to the model.
#[derive(Clone, Debug)]
pub struct GenerationInput {
	/// Hard cap on the total number of generated tokens (seed included).
	pub max_len: usize,

	/// Optional seed for the random source; `None` draws OS entropy.
	pub rng_seed: Option<u64>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			max_len: MAX_GENERATED_TOKENS,
			rng_seed: None,
		}
	}
}

impl GenerationInput {
	/// Builds the random source for this run.
	///
	/// A fixed `rng_seed` makes generation fully reproducible.
	pub fn rng(&self) -> StdRng {
		match self.rng_seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

/// Lazy, finite, non-restartable stream of generated tokens.
///
/// Yields the starting state's tokens first, then tokens sampled from the
/// model, until `max_len` tokens have been produced in total.
///
/// The stream keeps the full history of produced tokens, but only the last
/// `n` form the current state: the model is memoryless beyond its order.
///
/// If the trailing window of the history was never observed as a training
/// state, the stream yields a single `Err(ModelError::UnknownState)` and
/// ends. The model itself is never mutated by a run.
pub struct Generation<'a, R> {
	model: &'a MarkovModel,
	history: Vec<String>,
	emitted: usize,
	max_len: usize,
	rng: R,
	done: bool,
}

impl<'a, R: Rng> Generation<'a, R> {
	pub(crate) fn new(model: &'a MarkovModel, start: &State, max_len: usize, rng: R) -> Self {
		Self {
			model,
			history: start.tokens().to_vec(),
			emitted: 0,
			max_len,
			rng,
			done: false,
		}
	}
}

impl<R: Rng> Iterator for Generation<'_, R> {
	type Item = Result<String, ModelError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		if self.emitted >= self.max_len {
			self.done = true;
			return None;
		}

		// Hand out the seed tokens before sampling anything
		if self.emitted < self.history.len() {
			let token = self.history[self.emitted].clone();
			self.emitted += 1;
			return Some(Ok(token));
		}

		let n = self.model.order();
		let window = &self.history[self.history.len() - n..];
		let state = State::new(window.iter().cloned());

		match self.model.select_next(&state, &mut self.rng) {
			Ok(token) => {
				let token = token.to_owned();
				self.history.push(token.clone());
				self.emitted += 1;
				Some(Ok(token))
			}
			Err(e) => {
				self.done = true;
				Some(Err(e))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use rand::RngCore;

	#[test]
	fn default_input_uses_the_reference_cap() {
		let input = GenerationInput::default();
		assert_eq!(input.max_len, 1000);
		assert!(input.rng_seed.is_none());
	}

	#[test]
	fn seeded_input_builds_a_deterministic_rng() {
		let input = GenerationInput {
			max_len: 10,
			rng_seed: Some(9),
		};
		let mut a = input.rng();
		let mut b = input.rng();
		assert_eq!(a.next_u64(), b.next_u64());
	}
}
