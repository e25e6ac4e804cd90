use std::fmt;

use indexmap::{IndexMap, IndexSet};

use rand::Rng;
use rand::prelude::IteratorRandom;

use super::error::ModelError;
use super::generation::Generation;
use super::state::{Distribution, State, Transitions};
use super::tokenizer;

/// Fixed-order word-level Markov model.
///
/// The `MarkovModel` stores states of exactly `n` tokens and allows
/// probabilistic generation of token sequences based on learned
/// transition frequencies.
///
/// # Responsibilities
/// - Build the state set and transition table from a corpus
/// - Derive the probability table from accumulated counts
/// - Resolve a seed word to a starting state
/// - Sample the next token for a state and drive generation runs
///
/// # Invariants
/// - `n` is always >= 1
/// - Every state in the transition table has at least one outgoing
///   transition, with strictly positive counts
/// - For every state in the probability table, outgoing probabilities
///   sum to 1.0 within floating-point tolerance
/// - Tables iterate in insertion order of first occurrence during training
#[derive(Clone, Debug)]
pub struct MarkovModel {
	/// The order of the model (number of tokens forming a state)
	n: usize, // must be >= 1

	/// All distinct states observed during training
	states: IndexSet<State>,

	/// Mapping from a state to its outgoing occurrence counts
	transitions: IndexMap<State, Transitions>,

	/// Mapping from a state to its derived probability distribution
	probabilities: IndexMap<State, Distribution>,
}

impl MarkovModel {
	/// Creates a new Markov model of order `n`.
	///
	/// # Errors
	/// Returns [`ModelError::InvalidOrder`] if `n < 1`.
	pub fn new(n: usize) -> Result<Self, ModelError> {
		if n < 1 {
			return Err(ModelError::InvalidOrder(n));
		}
		Ok(Self {
			n,
			states: IndexSet::new(),
			transitions: IndexMap::new(),
			probabilities: IndexMap::new(),
		})
	}

	/// The order of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct states observed so far.
	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	/// Whether `state` was observed during training.
	pub fn contains(&self, state: &State) -> bool {
		self.states.contains(state)
	}

	/// Trains the model on raw corpus text.
	///
	/// The text goes through the normalization pipeline
	/// ([`tokenizer::tokenize`]) before fitting.
	///
	/// # Errors
	/// See [`MarkovModel::fit_tokens`].
	pub fn fit(&mut self, text: &str) -> Result<(), ModelError> {
		self.fit_tokens(&tokenizer::tokenize(text))
	}

	/// Trains the model on an already-tokenized sequence.
	///
	/// For every index `i` in `0..=len - n - 1`, registers
	/// `tokens[i..i + n]` as a state and counts the transition toward
	/// `tokens[i + n]`. The corpus-final n-gram is therefore never a state.
	/// The probability table is re-derived from scratch afterwards.
	///
	/// # Notes
	/// Repeated calls accumulate counts across corpora; call
	/// [`MarkovModel::clear`] first to retrain from a blank model.
	///
	/// # Errors
	/// Returns [`ModelError::InsufficientData`] if fewer than `n + 1`
	/// tokens are supplied (no transition window can be formed).
	pub fn fit_tokens(&mut self, tokens: &[String]) -> Result<(), ModelError> {
		if tokens.len() <= self.n {
			return Err(ModelError::InsufficientData {
				order: self.n,
				required: self.n + 1,
				actual: tokens.len(),
			});
		}

		for window in tokens.windows(self.n + 1) {
			let state = State::new(window[..self.n].iter().cloned());
			let next_token = &window[self.n];

			self.states.insert(state.clone());
			self.transitions.entry(state).or_default().add(next_token);
		}

		self.derive_probabilities();
		Ok(())
	}

	/// Resets the model to its untrained state.
	pub fn clear(&mut self) {
		self.states.clear();
		self.transitions.clear();
		self.probabilities.clear();
	}

	/// Rebuilds the probability table from the transition table.
	///
	/// Deterministic and idempotent: deriving twice over unchanged counts
	/// yields identical probabilities.
	fn derive_probabilities(&mut self) {
		self.probabilities = self
			.transitions
			.iter()
			.map(|(state, transitions)| (state.clone(), Distribution::from_transitions(transitions)))
			.collect();
	}

	/// Samples the next token for `state` by a weighted random draw.
	///
	/// Pure function of the supplied random source and the state; the
	/// model is not mutated.
	///
	/// # Errors
	/// Returns [`ModelError::UnknownState`] if `state` was never observed
	/// in training.
	pub fn select_next<R: Rng>(&self, state: &State, rng: &mut R) -> Result<&str, ModelError> {
		let distribution = self
			.probabilities
			.get(state)
			.ok_or_else(|| ModelError::UnknownState(state.clone()))?;
		Ok(distribution.sample(rng))
	}

	/// All states whose first token equals the (case-normalized) seed word.
	pub fn seed_states(&self, word: &str) -> Vec<&State> {
		let word = word.to_lowercase();
		self.states
			.iter()
			.filter(|state| state.first() == Some(word.as_str()))
			.collect()
	}

	/// Resolves a seed word to a starting state, chosen uniformly at
	/// random among the candidates.
	///
	/// # Errors
	/// Returns [`ModelError::SeedNotFound`] if no state begins with the
	/// seed word. This is a user-input error, distinct from
	/// [`ModelError::UnknownStartState`].
	pub fn choose_seed_state<R: Rng>(&self, word: &str, rng: &mut R) -> Result<State, ModelError> {
		self.seed_states(word)
			.into_iter()
			.choose(rng)
			.cloned()
			.ok_or_else(|| ModelError::SeedNotFound(word.to_owned()))
	}

	/// Starts a generation run as a lazy token stream.
	///
	/// The stream yields the starting state's tokens first, then sampled
	/// tokens, until `max_len` tokens have been produced in total. The
	/// caller drains it at its own pace (see [`Generation`]).
	///
	/// # Errors
	/// Returns [`ModelError::UnknownStartState`] if `start` is not a
	/// member of the state set.
	pub fn generate_iter<R: Rng>(
		&self,
		start: &State,
		max_len: usize,
		rng: R,
	) -> Result<Generation<'_, R>, ModelError> {
		if !self.states.contains(start) {
			return Err(ModelError::UnknownStartState(start.clone()));
		}
		Ok(Generation::new(self, start, max_len, rng))
	}

	/// Runs a whole generation and collects the produced tokens.
	///
	/// A failure mid-sequence discards the entire in-progress output:
	/// there is no partial success.
	///
	/// # Errors
	/// - [`ModelError::UnknownStartState`] if `start` is not a model state
	/// - [`ModelError::UnknownState`] if the trailing window of the
	///   history stops matching a training state mid-run
	pub fn generate<R: Rng>(
		&self,
		start: &State,
		max_len: usize,
		rng: R,
	) -> Result<Vec<String>, ModelError> {
		self.generate_iter(start, max_len, rng)?.collect()
	}
}

impl fmt::Display for MarkovModel {
	/// Human-readable dump of the transition table: one line per state
	/// with raw occurrence counts (not probabilities), in insertion order
	/// of first occurrence during training.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (state, transitions) in &self.transitions {
			let edges = transitions
				.iter()
				.map(|(token, count)| format!("{token}: {count}"))
				.collect::<Vec<_>>()
				.join(", ");
			writeln!(f, "{state} -> [{edges}]")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use rand::rngs::StdRng;
	use rand::{RngCore, SeedableRng};

	const CORPUS: &str = "the cat sat the cat ran the dog sat";

	/// Rng that always produces zero, so weighted draws always land on the
	/// first stored candidate.
	struct ZeroRng;

	impl RngCore for ZeroRng {
		fn next_u32(&mut self) -> u32 {
			0
		}

		fn next_u64(&mut self) -> u64 {
			0
		}

		fn fill_bytes(&mut self, dest: &mut [u8]) {
			dest.fill(0);
		}
	}

	fn trained(n: usize) -> MarkovModel {
		let mut model = MarkovModel::new(n).unwrap();
		model.fit(CORPUS).unwrap();
		model
	}

	#[test]
	fn order_must_be_positive() {
		assert_eq!(MarkovModel::new(0).unwrap_err(), ModelError::InvalidOrder(0));
		assert!(MarkovModel::new(1).is_ok());
	}

	#[test]
	fn too_short_corpus_is_rejected() {
		let mut model = MarkovModel::new(4).unwrap();
		assert_eq!(
			model.fit("only three words"),
			Err(ModelError::InsufficientData {
				order: 4,
				required: 5,
				actual: 3,
			})
		);

		// Exactly n tokens still forms no transition window
		let mut model = MarkovModel::new(3).unwrap();
		assert!(matches!(
			model.fit("only three words"),
			Err(ModelError::InsufficientData { .. })
		));
	}

	#[test]
	fn transition_counts_match_the_reference_corpus() {
		let model = trained(2);

		let the_cat = State::new(["the", "cat"]);
		let counts: Vec<(&str, usize)> = model.transitions.get(&the_cat).unwrap().iter().collect();
		assert_eq!(counts, vec![("sat", 1), ("ran", 1)]);

		for (_, probability) in model.probabilities.get(&the_cat).unwrap().probabilities() {
			assert!((probability - 0.5).abs() < 1e-9);
		}

		assert!(model.contains(&State::new(["cat", "sat"])));
		assert!(model.contains(&State::new(["the", "dog"])));
		// The corpus-final bigram is never registered as a state
		assert!(!model.contains(&State::new(["dog", "sat"])));
	}

	#[test]
	fn probabilities_sum_to_one_for_every_state() {
		let model = trained(2);
		assert!(model.state_count() > 0);
		for distribution in model.probabilities.values() {
			let sum: f64 = distribution.probabilities().map(|(_, p)| p).sum();
			assert!((sum - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn probability_derivation_is_idempotent() {
		let mut model = trained(2);
		let before = model.probabilities.clone();
		model.derive_probabilities();
		assert_eq!(before, model.probabilities);
	}

	#[test]
	fn refitting_accumulates_counts_until_cleared() {
		let mut model = trained(2);
		model.fit(CORPUS).unwrap();

		let the_cat = State::new(["the", "cat"]);
		let counts: Vec<(&str, usize)> = model.transitions.get(&the_cat).unwrap().iter().collect();
		assert_eq!(counts, vec![("sat", 2), ("ran", 2)]);

		// Probabilities were re-derived over the doubled counts
		let sum: f64 = model
			.probabilities
			.get(&the_cat)
			.unwrap()
			.probabilities()
			.map(|(_, p)| p)
			.sum();
		assert!((sum - 1.0).abs() < 1e-9);

		model.clear();
		assert_eq!(model.state_count(), 0);
		assert!(model.transitions.is_empty());
		assert!(model.probabilities.is_empty());
	}

	#[test]
	fn single_occurrence_state_always_yields_its_token() {
		let model = trained(2);
		let cat_sat = State::new(["cat", "sat"]);
		let mut rng = StdRng::seed_from_u64(1);
		for _ in 0..200 {
			assert_eq!(model.select_next(&cat_sat, &mut rng).unwrap(), "the");
		}
	}

	#[test]
	fn sampling_an_unknown_state_fails() {
		let model = trained(2);
		let bogus = State::new(["sat", "dog"]);
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(
			model.select_next(&bogus, &mut rng),
			Err(ModelError::UnknownState(bogus.clone()))
		);
	}

	#[test]
	fn first_candidate_rng_walks_the_chain() {
		let model = trained(2);
		let start = State::new(["the", "cat"]);
		let words = model.generate(&start, 6, ZeroRng).unwrap();
		assert_eq!(words, vec!["the", "cat", "sat", "the", "cat", "sat"]);
	}

	#[test]
	fn dead_end_state_fails_fast() {
		let model = trained(2);
		// (the, dog) -> sat leads to (dog, sat), the corpus-final bigram,
		// which was never trained as a state: the whole run is discarded
		let start = State::new(["the", "dog"]);
		assert_eq!(
			model.generate(&start, 1000, ZeroRng).unwrap_err(),
			ModelError::UnknownState(State::new(["dog", "sat"]))
		);
	}

	#[test]
	fn unknown_start_state_is_rejected() {
		let model = trained(2);
		let bogus = State::new(["sat", "dog"]);
		assert_eq!(
			model.generate(&bogus, 10, ZeroRng).unwrap_err(),
			ModelError::UnknownStartState(bogus.clone())
		);
	}

	#[test]
	fn generation_stops_at_the_cap() {
		// Cyclic corpus: every reachable bigram is a training state,
		// so only the cap can stop the run
		let mut model = MarkovModel::new(2).unwrap();
		model.fit("a b c a b c a b c a b").unwrap();
		let words = model
			.generate(&State::new(["a", "b"]), 50, StdRng::seed_from_u64(7))
			.unwrap();
		assert_eq!(words.len(), 50);
	}

	#[test]
	fn cap_smaller_than_the_seed_truncates_it() {
		let model = trained(2);
		let words = model.generate(&State::new(["the", "cat"]), 1, ZeroRng).unwrap();
		assert_eq!(words, vec!["the"]);
	}

	#[test]
	fn fixed_rng_seed_reproduces_the_sequence() {
		let mut model = MarkovModel::new(2).unwrap();
		model
			.fit(
				"the cat sat on the mat the cat ran on the grass \
				 the cat sat on the grass the cat ran on the mat the cat",
			)
			.unwrap();

		let start = State::new(["the", "cat"]);
		let first = model
			.generate(&start, 40, StdRng::seed_from_u64(42))
			.unwrap();
		let second = model
			.generate(&start, 40, StdRng::seed_from_u64(42))
			.unwrap();
		assert_eq!(first, second);
		assert_eq!(first.len(), 40);
	}

	#[test]
	fn seed_word_resolves_to_matching_states() {
		let model = trained(2);
		assert_eq!(model.seed_states("the").len(), 2);

		// Seed matching is case-normalized
		let mut rng = StdRng::seed_from_u64(3);
		let start = model.choose_seed_state("The", &mut rng).unwrap();
		assert_eq!(start.tokens()[0], "the");
		assert!(model.contains(&start));
	}

	#[test]
	fn unknown_seed_word_is_a_distinct_condition() {
		let model = trained(2);
		let mut rng = StdRng::seed_from_u64(3);
		assert_eq!(
			model.choose_seed_state("zebra", &mut rng),
			Err(ModelError::SeedNotFound("zebra".to_owned()))
		);
	}

	#[test]
	fn dump_lists_counts_in_first_occurrence_order() {
		let model = trained(2);
		let dump = model.to_string();
		let lines: Vec<&str> = dump.lines().collect();
		assert_eq!(lines.len(), 6);
		assert_eq!(lines[0], r#"("the", "cat") -> [sat: 1, ran: 1]"#);
		assert_eq!(lines[1], r#"("cat", "sat") -> [the: 1]"#);
		assert_eq!(lines[5], r#"("the", "dog") -> [sat: 1]"#);
	}

	#[test]
	fn order_one_model_works() {
		let mut model = MarkovModel::new(1).unwrap();
		model.fit("a b a b a").unwrap();
		let words = model.generate(&State::new(["a"]), 5, ZeroRng).unwrap();
		assert_eq!(words, vec!["a", "b", "a", "b", "a"]);
	}
}
