//! Word dictionaries.
//!
//! Abbreviations consulted by sentence segmentation and the valence
//! lexicon behind the built-in sentiment scorer.

pub mod abbreviations;
pub mod sentiment;
