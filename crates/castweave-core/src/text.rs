//! Sentence segmentation and input cleanup.
//!
//! Sentences are reported as byte ranges into the original text so the
//! tokenizer can attach every token to its owning sentence and passages can
//! later be sliced back out of the source verbatim.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionaries::abbreviations::is_abbreviation;

/// Initialisms such as `J.K` or `U.S` (trailing period already consumed).
static INITIALISM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}(?:\.\p{Lu})*$").expect("valid regex"));

/// Longest word examined behind a period; abbreviations and initialisms
/// are far shorter.
const MAX_WORD_BEFORE: usize = 64;

/// Runs of two or more spaces.
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Split text into sentence byte ranges.
///
/// Every non-whitespace byte of `text` falls inside exactly one returned
/// range; ranges are ascending, non-overlapping and trimmed of surrounding
/// whitespace. A blank line always ends a sentence.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn sentence_ranges(text: &str) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];

        if ch == '\n' && is_paragraph_break(&chars, i) {
            push_trimmed(text, start..pos, &mut ranges);
            start = pos;
        } else if is_terminator(ch) {
            // Treat "?!", "..." and a closing quote as one terminator run.
            let mut last = i;
            while last + 1 < chars.len() && is_terminator(chars[last + 1].1) {
                last += 1;
            }
            let punct_end = last;
            while last + 1 < chars.len() && is_closing(chars[last + 1].1) {
                last += 1;
            }
            let end = chars[last].0 + chars[last].1.len_utf8();

            let context = BoundaryContext::at(&chars, i, punct_end, last);
            if context.is_boundary() {
                push_trimmed(text, start..end, &mut ranges);
                start = end;
            }
            i = last + 1;
            continue;
        }

        i += 1;
    }

    push_trimmed(text, start..text.len(), &mut ranges);
    ranges
}

/// Normalize pasted story text before analysis.
///
/// Curly quotes become straight quotes and en or em dashes become spaces,
/// so two names joined by a dash still tokenize as two names. Characters
/// outside printable ASCII are dropped, line breaks are kept, and runs of
/// spaces collapse to one.
pub fn clean_text(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter_map(|ch| match ch {
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2013}' | '\u{2014}' => Some(' '),
            '\t' => Some(' '),
            '\n' => Some('\n'),
            c if c.is_ascii_graphic() || c == ' ' => Some(c),
            _ => None,
        })
        .collect();
    SPACE_RUNS.replace_all(&mapped, " ").into_owned()
}

fn push_trimmed(text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead + trail < slice.len() {
        out.push(range.start + lead..range.end - trail);
    }
}

fn is_paragraph_break(chars: &[(usize, char)], newline: usize) -> bool {
    chars[newline + 1..]
        .iter()
        .map(|&(_, c)| c)
        .find(|&c| c == '\n' || !c.is_whitespace())
        == Some('\n')
}

const fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

const fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

const fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '\u{201C}' | '\u{2018}')
}

/// What surrounds a terminator run.
struct BoundaryContext {
    punctuation: char,
    run: String,
    word_before: String,
    /// Character immediately after the terminator run, if any.
    adjacent: Option<char>,
    /// First two non-whitespace characters after the run (closing marks included).
    next: [Option<char>; 2],
}

impl BoundaryContext {
    fn at(chars: &[(usize, char)], first: usize, punct_end: usize, last: usize) -> Self {
        let mut word: Vec<char> = chars[..first]
            .iter()
            .rev()
            .map(|&(_, c)| c)
            .take_while(|c| c.is_alphanumeric() || *c == '.')
            .take(MAX_WORD_BEFORE)
            .collect();
        word.reverse();

        let mut following = chars[last + 1..]
            .iter()
            .map(|&(_, c)| c)
            .skip_while(|c| c.is_whitespace());

        Self {
            punctuation: chars[punct_end].1,
            run: chars[first..=punct_end].iter().map(|&(_, c)| c).collect(),
            word_before: word.into_iter().collect(),
            adjacent: chars.get(punct_end + 1).map(|&(_, c)| c),
            next: [following.next(), following.next()],
        }
    }

    fn is_boundary(&self) -> bool {
        let Some(next) = self.next[0] else {
            return true;
        };

        // Period inside a token: 3.14, example.com, e.g.x
        if let Some(adjacent) = self.adjacent
            && !adjacent.is_whitespace()
            && !is_closing(adjacent)
            && !is_terminator(adjacent)
        {
            return false;
        }

        if self.punctuation == '.' {
            if self.run.ends_with("...") {
                return false;
            }
            if is_abbreviation(&self.word_before.to_lowercase()) {
                return false;
            }
            if INITIALISM.is_match(&self.word_before) {
                return false;
            }
        }

        let lead = if is_quote(next) {
            self.next[1].unwrap_or(next)
        } else {
            next
        };
        !lead.is_lowercase()
    }
}
