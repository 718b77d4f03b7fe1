//! Sentence-aligned passages built from proximity regions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::overlap::{OverlapRange, find_overlaps};

/// Half-open token range `[start, end)` aligned to sentence boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentenceSpan {
    /// First token of the first sentence.
    pub start: usize,
    /// One past the last token of the last sentence.
    pub end: usize,
}

/// Widen each region to the sentences containing its endpoints.
///
/// # Panics
///
/// Panics if a region points past the end of `document`.
pub fn sentence_spans(ranges: &[OverlapRange], document: &Document) -> Vec<SentenceSpan> {
    ranges
        .iter()
        .map(|r| SentenceSpan {
            start: document.sentence_of(r.begin).start,
            end: document.sentence_of(r.end).end,
        })
        .collect()
}

/// Coalesce ordered spans that overlap or touch.
///
/// Spans arrive ordered by start. Whenever the accumulated span reaches the
/// next span's start, the two become one span; otherwise the accumulated
/// span is emitted. The output is strictly increasing with a gap between
/// consecutive spans, so merging it again changes nothing.
pub fn merge_spans(spans: &[SentenceSpan]) -> Vec<SentenceSpan> {
    let mut merged: Vec<SentenceSpan> = Vec::with_capacity(spans.len());
    for &span in spans {
        match merged.last_mut() {
            Some(acc) if acc.end >= span.start => acc.end = acc.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Merged passages in which the characters at positions `a` and `b` interact.
pub fn overlap_passages(
    document: &Document,
    a: &[usize],
    b: &[usize],
    window_size: usize,
) -> Vec<SentenceSpan> {
    let ranges = find_overlaps(a, b, window_size);
    merge_spans(&sentence_spans(&ranges, document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{RuleTokenizer, Tokenizer};

    fn span(start: usize, end: usize) -> SentenceSpan {
        SentenceSpan { start, end }
    }

    #[test]
    fn empty_input_merges_to_empty() {
        assert!(merge_spans(&[]).is_empty());
    }

    #[test]
    fn overlapping_spans_merge() {
        let merged = merge_spans(&[span(0, 10), span(5, 12), span(20, 25)]);
        assert_eq!(merged, vec![span(0, 12), span(20, 25)]);
    }

    #[test]
    fn touching_spans_merge() {
        let merged = merge_spans(&[span(0, 5), span(5, 9)]);
        assert_eq!(merged, vec![span(0, 9)]);
    }

    #[test]
    fn contained_span_does_not_shrink_accumulator() {
        let merged = merge_spans(&[span(0, 10), span(0, 4)]);
        assert_eq!(merged, vec![span(0, 10)]);
    }

    #[test]
    fn merging_is_idempotent() {
        let once = merge_spans(&[span(0, 3), span(2, 6), span(8, 9), span(9, 14), span(20, 21)]);
        assert_eq!(merge_spans(&once), once);
        for pair in once.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn regions_widen_to_sentences() {
        let doc = RuleTokenizer
            .tokenize("Aang waved. Katara smiled back. Sokka ate.")
            .unwrap();
        // "Aang" is token 0, "Katara" token 3; sentence 1 ends at token 7
        let spans = sentence_spans(&[OverlapRange { begin: 0, end: 3 }], &doc);
        assert_eq!(spans, vec![span(0, 7)]);
        assert_eq!(
            doc.span_text(spans[0].start, spans[0].end),
            "Aang waved. Katara smiled back."
        );
    }

    #[test]
    fn adjacent_sentence_regions_become_one_passage() {
        let doc = RuleTokenizer
            .tokenize("Aang met Zuko. Zuko met Aang. Momo slept all day long.")
            .unwrap();
        // Two regions in consecutive sentences: spans [0,4) and [4,8) touch.
        let ranges = [
            OverlapRange { begin: 0, end: 2 },
            OverlapRange { begin: 4, end: 6 },
        ];
        let merged = merge_spans(&sentence_spans(&ranges, &doc));
        assert_eq!(merged, vec![span(0, 8)]);
    }

    #[test]
    fn passages_for_a_pair() {
        let doc = RuleTokenizer
            .tokenize("Toph laughed at Sokka. It rained for days and days and days. Sokka sulked.")
            .unwrap();
        let toph: Vec<usize> = vec![0];
        let sokka: Vec<usize> = doc
            .token_texts()
            .enumerate()
            .filter(|(_, t)| *t == "Sokka")
            .map(|(i, _)| i)
            .collect();
        let passages = overlap_passages(&doc, &toph, &sokka, 4);
        assert_eq!(passages.len(), 1);
        assert_eq!(
            doc.span_text(passages[0].start, passages[0].end),
            "Toph laughed at Sokka."
        );
    }
}
