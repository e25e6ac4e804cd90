//! Top-level module for the Markov generation system.
//!
//! This module provides a word-level, fixed-order Markov text generator:
//! - The model itself (`MarkovModel`)
//! - State representation and per-state storage (`State`)
//! - Corpus tokenization/normalization (`tokenizer`)
//! - The generation stream and its configuration (`generation`)
//! - The error taxonomy (`error`)

/// Fixed-order word-level Markov model (`n >= 1`).
///
/// Handles corpus ingestion, transition counting, probability derivation,
/// seed-word resolution, weighted next-token sampling and generation.
pub mod markov_model;

/// Representation of a single model state (ordered tuple of `n` tokens).
///
/// Also holds the per-state transition counts and derived probability
/// distribution; those storage types are not exposed publicly.
pub mod state;

/// Corpus pre-processing: digit/punctuation stripping, lower-casing,
/// whitespace splitting.
pub mod tokenizer;

/// Lazy generation stream and generation parameters.
///
/// The stream yields the seed tokens first, then sampled tokens, up to a
/// hard length cap. Pacing between tokens is the consumer's business.
pub mod generation;

/// Error kinds reported by training, sampling and generation.
pub mod error;
