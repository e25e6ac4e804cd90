//! Word-level Markov chain text generation library.
//!
//! This crate provides a fixed-order n-gram Markov model including:
//! - Corpus tokenization and normalization
//! - State/transition table construction with frequency counting
//! - Probability derivation and weighted random sampling
//! - A lazy generation stream with a hard length cap
//!
//! The model performs no I/O: callers supply raw text and drain the
//! generated token stream themselves (printing, pacing, etc.).

/// Core Markov model and generation logic.
///
/// This module exposes the model, its error taxonomy and the generation
/// stream while keeping per-state storage internal.
pub mod model;
