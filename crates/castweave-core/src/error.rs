//! Error types for castweave-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A sentiment lexicon file could not be read.
    #[error("failed to read lexicon file {path}: {source}")]
    LexiconFile {
        /// The lexicon path that was requested.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A sentiment lexicon file is not a JSON object of word valences.
    #[error("invalid lexicon file {path}: {source}")]
    LexiconParse {
        /// The lexicon path that was parsed.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during interaction analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input text is empty or tokenizes to nothing.
    #[error("no analyzable text in input")]
    EmptyInput,

    /// The character roster has no names.
    #[error("character roster is empty")]
    EmptyRoster,

    /// A roster entry is blank.
    #[error("character roster contains an empty name")]
    EmptyCharacterName,

    /// The same name appears twice in the roster.
    #[error("duplicate character in roster: {0}")]
    DuplicateCharacter(String),

    /// The window does not fit the document.
    #[error("window size {window_size} is outside 1..={tokens} for this document")]
    InvalidWindow {
        /// Requested window width in tokens.
        window_size: usize,
        /// Number of tokens in the document.
        tokens: usize,
    },

    /// An externally supplied document violates its structural contract.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The tokenizer failed.
    #[error("tokenizer failed: {0}")]
    Tokenizer(String),

    /// The sentiment scorer failed.
    #[error("sentiment scorer failed: {0}")]
    Scorer(String),
}

impl AnalysisError {
    /// Returns `true` for errors caused by caller-supplied settings
    /// (roster or window) rather than by the text or an external component.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyRoster
                | Self::EmptyCharacterName
                | Self::DuplicateCharacter(_)
                | Self::InvalidWindow { .. }
        )
    }
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;
