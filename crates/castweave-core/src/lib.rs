//! Core library for castweave.
//!
//! castweave measures how the characters of a story interact: how often
//! each pair shares a window of text, which passages bring them together,
//! and how positive or negative those passages read.
//!
//! # Modules
//!
//! - [`document`] - Tokenized documents and the [`Tokenizer`] seam
//! - [`window`] - Sliding-window presence and co-presence frequencies
//! - [`overlap`] / [`spans`] - Proximity regions and sentence-aligned passages
//! - [`sentiment`] - Passage scoring and length-weighted aggregation
//! - [`analytics`] - The orchestrator producing an [`AnalyticsResult`]
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use castweave_core::{RuleTokenizer, Tokenizer, analyze};
//!
//! let document = RuleTokenizer
//!     .tokenize("Zuko bowed to Iroh. Iroh laughed warmly.")
//!     .expect("tokenize");
//! let mut result = analyze(&document, &["Zuko", "Iroh"], 5).expect("analyze");
//! result.zero_self_pairs();
//! println!("{:?}", result.pair_freqs);
//! ```
#![deny(unsafe_code)]

pub mod analytics;
pub mod config;
pub mod dictionaries;
pub mod document;
pub mod error;
pub mod markdown;
pub mod matrix;
pub mod occurrence;
pub mod overlap;
pub mod roster;
pub mod sentiment;
pub mod spans;
pub mod text;
pub mod window;

pub use analytics::{
    AnalyticsResult, AnalyzeOptions, PairSummary, analyze, analyze_text, analyze_with,
    pair_passages,
};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use document::{Document, RuleTokenizer, Sentence, Token, Tokenizer};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use roster::Roster;
pub use sentiment::{LexiconScorer, PassageSentiment, SentimentScorer};

/// Default window width in tokens.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
