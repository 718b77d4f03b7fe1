//! Passage sentiment.
//!
//! Scoring is pluggable through [`SentimentScorer`]: any scorer that maps
//! text to a compound polarity in `[-1.0, 1.0]` can drive the analysis.
//! [`LexiconScorer`] is the built-in rule-based implementation.

use std::collections::HashMap;
use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionaries::sentiment::{BOOSTERS, NEGATORS, VALENCES};
use crate::error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};

/// Lowercased words, apostrophes kept so `didn't` stays one word.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)*").expect("valid regex"));

/// Normalization constant: `s / sqrt(s² + ALPHA)` maps sums into (-1, 1).
const ALPHA: f64 = 15.0;

/// Valence multiplier for a negated word.
const NEGATION_SCALAR: f64 = -0.74;

/// Extra intensity per exclamation mark (at most four count).
const EXCLAMATION_BOOST: f64 = 0.292;

/// Maps text to a compound polarity score.
pub trait SentimentScorer {
    /// Score `text`; the result must lie in `[-1.0, 1.0]`.
    fn score(&self, text: &str) -> AnalysisResult<f64>;
}

/// Word-valence sentiment with negation, boosters and emphasis.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            valences: VALENCES
                .iter()
                .map(|(word, valence)| ((*word).to_string(), *valence))
                .collect(),
        }
    }
}

impl LexiconScorer {
    /// Scorer over the built-in lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override a word's valence (clamped to `-4.0..=4.0`).
    pub fn with_word(mut self, word: &str, valence: f64) -> Self {
        self.valences
            .insert(word.to_lowercase(), valence.clamp(-4.0, 4.0));
        self
    }

    /// Extend the built-in lexicon with a JSON object of `word: valence`.
    ///
    /// Entries in the file override built-in valences for the same word.
    pub fn with_lexicon_file(self, path: &Utf8Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path.as_std_path()).map_err(|source| {
            ConfigError::LexiconFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let entries: HashMap<String, f64> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::LexiconParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path, entries = entries.len(), "loaded lexicon file");
        Ok(entries
            .iter()
            .fold(self, |scorer, (word, valence)| scorer.with_word(word, *valence)))
    }

    /// Number of words with a valence.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    fn raw_sum(&self, text: &str) -> f64 {
        let words: Vec<String> = WORD_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        let mut sum = 0.0;
        for (i, word) in words.iter().enumerate() {
            let Some(&base) = self.valences.get(word) else {
                continue;
            };
            let preceding = &words[i.saturating_sub(3)..i];

            let mut valence = base;
            for (distance, prior) in preceding.iter().rev().enumerate() {
                if let Some(&boost) = BOOSTERS.get(prior.as_str()) {
                    let decay = [1.0, 0.95, 0.9][distance];
                    valence += boost * decay * base.signum();
                }
            }
            if preceding.iter().any(|w| is_negator(w)) {
                valence *= NEGATION_SCALAR;
            }
            sum += valence;
        }

        if sum != 0.0 {
            let marks = text.matches('!').count().min(4) as f64;
            sum += marks * EXCLAMATION_BOOST * sum.signum();
        }
        sum
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> AnalysisResult<f64> {
        let sum = self.raw_sum(text);
        Ok((sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0))
    }
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(word) || word.ends_with("n't")
}

/// A passage and its compound score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PassageSentiment {
    /// Passage text, verbatim from the source.
    pub text: String,
    /// Compound polarity in `[-1.0, 1.0]`.
    pub score: f64,
}

/// Score each passage once.
///
/// Scorer failures and out-of-range scores surface as
/// [`AnalysisError::Scorer`].
pub fn score_passages<'a, I>(
    scorer: &dyn SentimentScorer,
    texts: I,
) -> AnalysisResult<Vec<PassageSentiment>>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .map(|text| {
            let score = scorer.score(text)?;
            if !(-1.0..=1.0).contains(&score) {
                return Err(AnalysisError::Scorer(format!(
                    "score {score} is outside [-1, 1]"
                )));
            }
            Ok(PassageSentiment {
                text: text.to_string(),
                score,
            })
        })
        .collect()
}

/// Length-weighted mean score, weighting by character count.
///
/// Returns `0.0` when there are no passages or they are all empty.
pub fn weighted_mean(passages: &[PassageSentiment]) -> f64 {
    let (weighted, total) = passages.iter().fold((0.0, 0usize), |(sum, len), p| {
        let chars = p.text.chars().count();
        (p.score.mul_add(chars as f64, sum), len + chars)
    });
    if total == 0 {
        0.0
    } else {
        weighted / total as f64
    }
}
