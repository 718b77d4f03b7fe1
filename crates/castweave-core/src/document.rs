//! Tokenized documents.
//!
//! A [`Document`] is the immutable input to every analysis: an ordered token
//! sequence where each token knows its byte span in the source text and the
//! sentence it belongs to. Documents come from a [`Tokenizer`]; the built-in
//! [`RuleTokenizer`] covers plain English prose, and external pipelines can
//! hand in their own segmentation through [`Document::from_parts`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::text;

/// Words, split-off English clitics, and single punctuation marks.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'(?i:s|d|m|t|ll|re|ve)\b|[\p{L}\p{N}]+|\S").expect("valid regex")
});

/// One token of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text.
    pub text: String,
    /// Byte offset of the first character in the source.
    pub start: usize,
    /// Byte offset one past the last character in the source.
    pub end: usize,
    /// Index of the owning sentence in [`Document::sentences`].
    pub sentence: usize,
}

/// A sentence as a half-open token range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
}

impl Sentence {
    /// Number of tokens in the sentence.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the sentence has no tokens.
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Source text plus its tokens and sentence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    tokens: Vec<Token>,
    sentences: Vec<Sentence>,
}

impl Document {
    /// Assemble a document from an external segmentation.
    ///
    /// Sentences must be non-empty, contiguous from token 0, and cover every
    /// token; each token must reference the sentence containing it and lie on
    /// ascending character boundaries inside `source`.
    pub fn from_parts(
        source: impl Into<String>,
        tokens: Vec<Token>,
        sentences: Vec<Sentence>,
    ) -> AnalysisResult<Self> {
        let source = source.into();
        let malformed = |msg: String| Err(AnalysisError::MalformedDocument(msg));

        let mut expected_start = 0;
        for (idx, sentence) in sentences.iter().enumerate() {
            if sentence.start != expected_start || sentence.is_empty() {
                return malformed(format!(
                    "sentence {idx} spans {}..{}, expected a non-empty range starting at {expected_start}",
                    sentence.start, sentence.end
                ));
            }
            expected_start = sentence.end;
        }
        if expected_start != tokens.len() {
            return malformed(format!(
                "sentences cover {expected_start} tokens but the document has {}",
                tokens.len()
            ));
        }

        let mut previous_end = 0;
        for (idx, token) in tokens.iter().enumerate() {
            let owner = sentences.get(token.sentence);
            if !owner.is_some_and(|s| (s.start..s.end).contains(&idx)) {
                return malformed(format!(
                    "token {idx} claims sentence {} which does not contain it",
                    token.sentence
                ));
            }
            let in_bounds = token.start >= previous_end
                && token.start <= token.end
                && source.get(token.start..token.end).is_some();
            if !in_bounds {
                return malformed(format!(
                    "token {idx} byte range {}..{} is out of order or outside the source",
                    token.start, token.end
                ));
            }
            previous_end = token.end;
        }

        Ok(Self {
            source,
            tokens,
            sentences,
        })
    }

    /// The text the document was tokenized from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All tokens in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The sentence table.
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surface text of every token, in order.
    pub fn token_texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }

    /// The sentence that owns token `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn sentence_of(&self, index: usize) -> Sentence {
        self.sentences[self.tokens[index].sentence]
    }

    /// Literal source text covering the half-open token range `[start, end)`.
    ///
    /// Returns an empty string for an empty range.
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        if start >= end {
            return "";
        }
        let first = &self.tokens[start];
        let last = &self.tokens[end - 1];
        &self.source[first.start..last.end]
    }
}

/// Turns raw text into a [`Document`].
pub trait Tokenizer {
    /// Tokenize `raw` and segment it into sentences.
    fn tokenize(&self, raw: &str) -> AnalysisResult<Document>;
}

/// Regex-and-heuristics tokenizer for English prose.
///
/// Sentences come from [`text::sentence_ranges`]; inside each sentence,
/// tokens are runs of letters and digits, clitics such as `'s` and `'ll`,
/// and single punctuation marks. `Zuko's` therefore yields `Zuko` and `'s`,
/// so possessives still count as a mention.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer;

impl Tokenizer for RuleTokenizer {
    #[tracing::instrument(skip_all, fields(text_len = raw.len()))]
    fn tokenize(&self, raw: &str) -> AnalysisResult<Document> {
        let mut tokens = Vec::new();
        let mut sentences = Vec::new();

        for range in text::sentence_ranges(raw) {
            let first = tokens.len();
            let sentence = sentences.len();
            tokens.extend(
                TOKEN_PATTERN
                    .find_iter(&raw[range.clone()])
                    .map(|m| Token {
                        text: m.as_str().to_string(),
                        start: range.start + m.start(),
                        end: range.start + m.end(),
                        sentence,
                    }),
            );
            if tokens.len() > first {
                sentences.push(Sentence {
                    start: first,
                    end: tokens.len(),
                });
            }
        }

        tracing::debug!(
            tokens = tokens.len(),
            sentences = sentences.len(),
            "tokenized document"
        );
        Ok(Document {
            source: raw.to_string(),
            tokens,
            sentences,
        })
    }
}
