use std::fmt;

use indexmap::IndexMap;

use rand::Rng;

/// Represents a state in the Markov model.
///
/// A `State` is an ordered tuple of exactly `n` normalized tokens (words).
/// It is immutable once created; equality and hashing are by value,
/// element-wise.
///
/// Conceptually, this is a node in a Markov chain whose outgoing edges
/// are weighted by their number of observations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State(Vec<String>);

impl State {
	/// Creates a state from a sequence of tokens.
	pub fn new<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(tokens.into_iter().map(Into::into).collect())
	}

	/// The tokens forming this state, in order.
	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	/// Number of tokens in the state.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// First token of the state, used for seed-word resolution.
	pub(crate) fn first(&self) -> Option<&str> {
		self.0.first().map(String::as_str)
	}
}

impl fmt::Display for State {
	/// Formats the state as a tuple, ex. `("the", "cat")`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "(")?;
		for (i, token) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{token:?}")?;
		}
		write!(f, ")")
	}
}

/// Outgoing transitions of a single state.
///
/// Accumulates transition occurrences during training. Next tokens are
/// kept in insertion order of first occurrence, which fixes both the
/// debug-dump ordering and the order of the cumulative sampling walk.
///
/// ## Invariants
/// - Each occurrence count is strictly positive
/// - Never empty once stored in the transition table
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Transitions {
	counts: IndexMap<String, usize>,
}

impl Transitions {
	/// Records an occurrence of a transition toward `next_token`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub(crate) fn add(&mut self, next_token: &str) {
		if let Some(count) = self.counts.get_mut(next_token) {
			*count += 1;
		} else {
			self.counts.insert(next_token.to_owned(), 1);
		}
	}

	/// Total number of observed outgoing occurrences.
	pub(crate) fn total(&self) -> usize {
		self.counts.values().sum()
	}

	/// Iterates over `(next_token, count)` pairs in first-occurrence order.
	pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(token, count)| (token.as_str(), *count))
	}
}

/// Normalized outgoing probabilities of a single state.
///
/// Derived from [`Transitions`] by dividing each count by the state total;
/// probabilities sum to 1.0 (within floating-point tolerance) and keep the
/// same stored order as the counts they were derived from. Never mutated
/// directly, only rebuilt.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Distribution {
	weights: IndexMap<String, f64>,
}

impl Distribution {
	/// Derives the probability distribution from raw occurrence counts.
	///
	/// A state observed only once yields a single token with probability 1.0.
	pub(crate) fn from_transitions(transitions: &Transitions) -> Self {
		let total = transitions.total() as f64;
		let weights = transitions
			.iter()
			.map(|(token, count)| (token.to_owned(), count as f64 / total))
			.collect();
		Self { weights }
	}

	/// Iterates over `(next_token, probability)` pairs in stored order.
	pub(crate) fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
		self.weights.iter().map(|(token, weight)| (token.as_str(), *weight))
	}

	/// Selects the next token by a fair categorical draw.
	///
	/// Picks a uniform random value in `[0, total weight)`, then walks the
	/// cumulative distribution in stored order and returns the first token
	/// whose cumulative weight exceeds the draw.
	pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> &str {
		let total: f64 = self.weights.values().sum();
		let draw = rng.random_range(0.0..total);

		let mut cumulative = 0.0;
		let mut fallback = "";
		for (token, weight) in &self.weights {
			cumulative += weight;
			if draw < cumulative {
				return token;
			}
			fallback = token;
		}

		// Rounding can leave the draw above the last cumulative bound;
		// fall back to the final token.
		fallback
	}
}
