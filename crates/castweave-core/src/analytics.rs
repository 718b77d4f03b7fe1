//! Character interaction analytics.
//!
//! [`analyze_with`] composes the pipeline for one roster over one document:
//!
//! 1. validate the roster and window,
//! 2. sweep the windows once for presence and co-presence frequencies,
//! 3. drop characters that never appear,
//! 4. index every remaining character's mentions once,
//! 5. for each unordered pair, find proximity regions, widen them to
//!    sentences, merge, and score each passage.
//!
//! Every structure is built fresh per call; nothing is shared between runs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Tokenizer};
use crate::error::{AnalysisError, AnalysisResult};
use crate::matrix::PairMatrix;
use crate::occurrence::OccurrenceIndex;
use crate::roster::Roster;
use crate::sentiment::{LexiconScorer, PassageSentiment, SentimentScorer, score_passages, weighted_mean};
use crate::spans::overlap_passages;
use crate::text;
use crate::window::{count_windows, validate_window};

/// Everything the interaction views need for one roster.
///
/// All vectors and matrices are indexed by position in `char_list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyticsResult {
    /// Requested characters that appear at least once, in roster order.
    pub char_list: Vec<String>,
    /// Fraction of windows in which each character is present.
    pub char_freqs: Vec<f64>,
    /// Symmetric co-presence frequencies. The diagonal holds the fraction of
    /// windows where that character is the only one present, unless
    /// [`AnalyticsResult::zero_self_pairs`] was applied.
    pub pair_freqs: Vec<Vec<f64>>,
    /// Merged passages and their scores for every pair; the diagonal is empty.
    pub pair_sentences: Vec<Vec<Vec<PassageSentiment>>>,
    /// Length-weighted mean passage score for every pair.
    pub pair_sentiments: Vec<Vec<f64>>,
    /// Number of mentions of each character.
    pub mentions: Vec<usize>,
    /// Window width in tokens.
    pub window_size: usize,
    /// Number of windows swept.
    pub windows: usize,
}

/// One character pair, summarized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PairSummary {
    /// First character (earlier in the roster).
    pub first: String,
    /// Second character.
    pub second: String,
    /// Co-presence frequency.
    pub frequency: f64,
    /// Mean passage sentiment.
    pub sentiment: f64,
    /// Number of merged passages.
    pub passages: usize,
}

impl AnalyticsResult {
    /// Clear the "alone" diagonal of `pair_freqs` for interaction displays.
    pub fn zero_self_pairs(&mut self) {
        for (i, row) in self.pair_freqs.iter_mut().enumerate() {
            row[i] = 0.0;
        }
    }

    /// Position of `name` in `char_list`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.char_list.iter().position(|c| c == name)
    }

    /// Scored passages shared by two characters, if both are present.
    pub fn passages(&self, first: &str, second: &str) -> Option<&[PassageSentiment]> {
        let (i, j) = (self.position(first)?, self.position(second)?);
        Some(&self.pair_sentences[i][j])
    }

    /// Pairs that ever share a window, most frequent first.
    pub fn strongest_pairs(&self, limit: usize) -> Vec<PairSummary> {
        let k = self.char_list.len();
        let mut pairs: Vec<PairSummary> = (0..k)
            .flat_map(|i| (i + 1..k).map(move |j| (i, j)))
            .filter(|&(i, j)| self.pair_freqs[i][j] > 0.0)
            .map(|(i, j)| PairSummary {
                first: self.char_list[i].clone(),
                second: self.char_list[j].clone(),
                frequency: self.pair_freqs[i][j],
                sentiment: self.pair_sentiments[i][j],
                passages: self.pair_sentences[i][j].len(),
            })
            .collect();
        pairs.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
        pairs.truncate(limit);
        pairs
    }
}

/// Run the full analysis with the built-in [`LexiconScorer`].
pub fn analyze<S: AsRef<str>>(
    document: &Document,
    characters: &[S],
    window_size: usize,
) -> AnalysisResult<AnalyticsResult> {
    analyze_with(document, characters, window_size, &LexiconScorer::default())
}

/// Run the full analysis with a caller-supplied scorer.
///
/// Roster and window problems are reported before any work is done. The
/// returned `pair_freqs` keeps its "alone" diagonal.
#[tracing::instrument(skip_all, fields(tokens = document.len(), characters = characters.len(), window_size = window_size))]
pub fn analyze_with<S: AsRef<str>>(
    document: &Document,
    characters: &[S],
    window_size: usize,
    scorer: &dyn SentimentScorer,
) -> AnalysisResult<AnalyticsResult> {
    let roster = Roster::new(characters.iter().map(|c| c.as_ref()))?;
    if document.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    validate_window(window_size, document.len())?;

    let slots = roster.tag(document.token_texts());
    let counts = count_windows(&slots, roster.len(), window_size)?;

    let present: Vec<usize> = (0..roster.len())
        .filter(|&c| counts.char_freqs[c] > 0.0)
        .collect();
    let filtered = counts.project(&present);
    let occurrences = OccurrenceIndex::build(&slots, roster.len());
    tracing::debug!(
        present = present.len(),
        requested = roster.len(),
        "filtered roster to characters present in text"
    );

    let k = present.len();
    let mut sentences = PairMatrix::filled(k, Vec::new());
    let mut sentiments = PairMatrix::filled(k, 0.0);
    for i in 0..k {
        for j in i + 1..k {
            let spans = overlap_passages(
                document,
                occurrences.positions(present[i]),
                occurrences.positions(present[j]),
                window_size,
            );
            let scored = score_passages(
                scorer,
                spans.iter().map(|s| document.span_text(s.start, s.end)),
            )?;
            sentiments.set_symmetric(i, j, weighted_mean(&scored));
            sentences.set_symmetric(i, j, scored);
        }
    }

    let char_list = if present.is_empty() {
        Vec::new()
    } else {
        roster.select(&present)?.names().to_vec()
    };
    Ok(AnalyticsResult {
        char_list,
        char_freqs: filtered.char_freqs,
        pair_freqs: filtered.pair_freqs.into_rows(),
        pair_sentences: sentences.into_rows(),
        pair_sentiments: sentiments.into_rows(),
        mentions: present.iter().map(|&c| occurrences.mentions(c)).collect(),
        window_size,
        windows: counts.windows,
    })
}

/// Scored passages for a single pair of characters.
///
/// Cheaper than [`analyze_with`] when only one pair is of interest. Either
/// name missing from the text yields no passages.
#[tracing::instrument(skip(document, scorer), fields(tokens = document.len()))]
pub fn pair_passages(
    document: &Document,
    first: &str,
    second: &str,
    window_size: usize,
    scorer: &dyn SentimentScorer,
) -> AnalysisResult<Vec<PassageSentiment>> {
    let roster = Roster::new([first, second])?;
    if document.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    validate_window(window_size, document.len())?;

    let slots = roster.tag(document.token_texts());
    let occurrences = OccurrenceIndex::build(&slots, roster.len());
    let spans = overlap_passages(
        document,
        occurrences.positions(0),
        occurrences.positions(1),
        window_size,
    );
    score_passages(
        scorer,
        spans.iter().map(|s| document.span_text(s.start, s.end)),
    )
}

/// Caller-level settings for [`analyze_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Window width in tokens.
    pub window_size: usize,
    /// Normalize quotes, dashes and stray symbols before tokenizing.
    pub clean_input: bool,
    /// Keep the "alone" diagonal in `pair_freqs` instead of zeroing it.
    pub keep_self_pairs: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            window_size: crate::DEFAULT_WINDOW_SIZE,
            clean_input: false,
            keep_self_pairs: false,
        }
    }
}

/// Tokenize raw text and analyze it, applying display post-processing.
///
/// Unless `keep_self_pairs` is set, the diagonal of `pair_freqs` is zeroed.
pub fn analyze_text<S: AsRef<str>>(
    raw: &str,
    characters: &[S],
    options: &AnalyzeOptions,
    tokenizer: &dyn Tokenizer,
    scorer: &dyn SentimentScorer,
) -> AnalysisResult<AnalyticsResult> {
    let document = if options.clean_input {
        tokenizer.tokenize(&text::clean_text(raw))?
    } else {
        tokenizer.tokenize(raw)?
    };
    let mut result = analyze_with(&document, characters, options.window_size, scorer)?;
    if !options.keep_self_pairs {
        result.zero_self_pairs();
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{RuleTokenizer, Sentence, Token};

    fn doc(raw: &str) -> Document {
        RuleTokenizer.tokenize(raw).unwrap()
    }

    /// One token per word, one sentence per token.
    fn bare(words: &[&str]) -> Document {
        let source = words.join(" ");
        let mut offset = 0;
        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let token = Token {
                    text: (*w).to_string(),
                    start: offset,
                    end: offset + w.len(),
                    sentence: i,
                };
                offset += w.len() + 1;
                token
            })
            .collect();
        let sentences = (0..words.len())
            .map(|i| Sentence { start: i, end: i + 1 })
            .collect();
        Document::from_parts(source, tokens, sentences).unwrap()
    }

    #[test]
    fn whole_document_window() {
        let d = bare(&["Zuko", "said", "hi", "to", "Katara"]);
        let result = analyze(&d, &["Zuko", "Katara"], 5).unwrap();
        assert_eq!(result.char_list, ["Zuko", "Katara"]);
        assert_eq!(result.char_freqs, vec![1.0, 1.0]);
        assert_eq!(result.pair_freqs[0][1], 1.0);
        assert_eq!(result.pair_freqs[1][0], 1.0);
        assert_eq!(result.windows, 1);
    }

    #[test]
    fn spacing_decides_interaction() {
        let d = bare(&["A", "x", "x", "x", "x", "B"]);
        let narrow = analyze(&d, &["A", "B"], 3).unwrap();
        assert!(narrow.pair_sentences[0][1].is_empty());
        assert_eq!(narrow.pair_sentiments[0][1], 0.0);

        let wide = analyze(&d, &["A", "B"], 6).unwrap();
        assert_eq!(wide.pair_sentences[0][1].len(), 1);
        assert_eq!(wide.pair_sentences[0][1][0].text, "A x x x x B");
    }

    #[test]
    fn absent_characters_are_filtered() {
        let d = doc("Aang and Sokka went fishing. Sokka caught nothing.");
        let result = analyze(&d, &["Toph", "Aang", "Sokka", "Zuko"], 4).unwrap();
        assert_eq!(result.char_list, ["Aang", "Sokka"]);
        assert_eq!(result.char_freqs.len(), 2);
        assert_eq!(result.pair_freqs.len(), 2);
        assert_eq!(result.mentions, vec![1, 2]);
    }

    #[test]
    fn nobody_present_is_not_an_error() {
        let d = doc("Nobody here at all.");
        let result = analyze(&d, &["Toph"], 2).unwrap();
        assert!(result.char_list.is_empty());
        assert!(result.pair_freqs.is_empty());
    }

    #[test]
    fn sentiment_matrices_are_symmetric() {
        let d = doc(
            "Katara hugged Aang and smiled. Zuko glared at Sokka with hatred. \
             Aang laughed with Sokka. Toph punched Zuko.",
        );
        let result = analyze(&d, &["Aang", "Sokka", "Katara", "Zuko", "Toph"], 6).unwrap();
        let k = result.char_list.len();
        assert_eq!(k, 5);
        for i in 0..k {
            assert!(result.pair_sentences[i][i].is_empty());
            for j in 0..k {
                assert_eq!(result.pair_freqs[i][j], result.pair_freqs[j][i]);
                assert_eq!(result.pair_sentiments[i][j], result.pair_sentiments[j][i]);
                assert_eq!(result.pair_sentences[i][j], result.pair_sentences[j][i]);
            }
        }
        let katara_aang = result.passages("Katara", "Aang").unwrap();
        assert!(!katara_aang.is_empty());
        assert!(katara_aang[0].score > 0.0);
        let zuko = result.position("Zuko").unwrap();
        let sokka = result.position("Sokka").unwrap();
        assert!(result.pair_sentiments[zuko][sokka] < 0.0);
    }

    #[test]
    fn self_pairs_zeroed_for_display() {
        let d = bare(&["A", "x", "x", "x", "B"]);
        let mut result = analyze(&d, &["A", "B"], 2).unwrap();
        assert!(result.pair_freqs[0][0] > 0.0);
        result.zero_self_pairs();
        assert_eq!(result.pair_freqs[0][0], 0.0);
        assert_eq!(result.pair_freqs[1][1], 0.0);
    }

    #[test]
    fn configuration_errors_come_first() {
        let d = bare(&["A", "B"]);
        assert!(matches!(
            analyze(&d, &["A", "A"], 1),
            Err(AnalysisError::DuplicateCharacter(_))
        ));
        assert!(matches!(
            analyze::<&str>(&d, &[], 1),
            Err(AnalysisError::EmptyRoster)
        ));
        assert!(matches!(
            analyze(&d, &["A"], 3),
            Err(AnalysisError::InvalidWindow { .. })
        ));
        assert!(matches!(
            analyze(&d, &["A"], 0),
            Err(AnalysisError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn empty_document_is_reported() {
        let d = doc("");
        assert!(matches!(
            analyze(&d, &["A"], 1),
            Err(AnalysisError::EmptyInput)
        ));
    }

    struct Failing;

    impl SentimentScorer for Failing {
        fn score(&self, _text: &str) -> AnalysisResult<f64> {
            Err(AnalysisError::Scorer("offline".into()))
        }
    }

    impl Tokenizer for Failing {
        fn tokenize(&self, _raw: &str) -> AnalysisResult<Document> {
            Err(AnalysisError::Tokenizer("offline".into()))
        }
    }

    #[test]
    fn scorer_failures_propagate() {
        let d = bare(&["A", "B"]);
        let err = analyze_with(&d, &["A", "B"], 2, &Failing).unwrap_err();
        assert!(matches!(err, AnalysisError::Scorer(msg) if msg == "offline"));
    }

    #[test]
    fn tokenizer_failures_propagate() {
        for clean_input in [false, true] {
            let options = AnalyzeOptions {
                clean_input,
                ..AnalyzeOptions::default()
            };
            let err = analyze_text(
                "Aang met Zuko.",
                &["Aang", "Zuko"],
                &options,
                &Failing,
                &LexiconScorer::new(),
            )
            .unwrap_err();
            assert!(matches!(err, AnalysisError::Tokenizer(ref msg) if msg == "offline"));
        }
    }

    #[test]
    fn strongest_pairs_ranked_by_frequency() {
        let d = bare(&["A", "B", "x", "x", "A", "B", "C", "x", "x", "x", "A"]);
        let result = analyze(&d, &["A", "B", "C"], 2).unwrap();
        let top = result.strongest_pairs(5);
        assert_eq!(top[0].first, "A");
        assert_eq!(top[0].second, "B");
        assert!(top.windows(2).all(|w| w[0].frequency >= w[1].frequency));
        assert_eq!(result.strongest_pairs(1).len(), 1);
    }

    #[test]
    fn pair_passages_matches_full_analysis() {
        let d = doc("Toph teased Sokka. Sokka sighed. Much later, far away, Aang slept.");
        let full = analyze(&d, &["Toph", "Sokka"], 4).unwrap();
        let single = pair_passages(&d, "Toph", "Sokka", 4, &LexiconScorer::new()).unwrap();
        assert_eq!(full.passages("Toph", "Sokka").unwrap(), single.as_slice());
    }

    #[test]
    fn analyze_text_cleans_and_zeroes() {
        let options = AnalyzeOptions {
            window_size: 3,
            clean_input: true,
            keep_self_pairs: false,
        };
        let result = analyze_text(
            "Zuko\u{2014}Katara. Then Zuko left alone for a while.",
            &["Zuko", "Katara"],
            &options,
            &RuleTokenizer,
            &LexiconScorer::new(),
        )
        .unwrap();
        assert_eq!(result.char_list, ["Zuko", "Katara"]);
        assert!(result.pair_freqs[0][1] > 0.0);
        assert_eq!(result.pair_freqs[0][0], 0.0);
    }
}
