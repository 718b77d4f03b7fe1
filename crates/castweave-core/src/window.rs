//! Sliding-window presence and co-presence frequencies.
//!
//! A character is *present* in a window when it appears at least once among
//! the window's `window_size` consecutive tokens. [`count_windows`] keeps a
//! live per-character count and updates it by one token in, one token out
//! per step, so the sweep costs O(n·k) for n tokens and k characters rather
//! than rescanning every window.

use crate::error::{AnalysisError, AnalysisResult};
use crate::matrix::PairMatrix;

/// Normalized presence statistics for one roster over one document.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCounts {
    /// Number of windows swept (`n - window_size + 1`).
    pub windows: usize,
    /// Fraction of windows in which each character is present.
    pub char_freqs: Vec<f64>,
    /// Off-diagonal: fraction of windows where both characters are present.
    /// Diagonal: fraction of windows where that character is the only one present.
    pub pair_freqs: PairMatrix<f64>,
}

impl WindowCounts {
    /// Restrict to the given roster positions, in the given order.
    ///
    /// Characters that never appear are never present, so projecting away
    /// absent characters gives the same numbers as re-running the sweep on
    /// the smaller roster.
    pub fn project(&self, positions: &[usize]) -> Self {
        Self {
            windows: self.windows,
            char_freqs: positions.iter().map(|&i| self.char_freqs[i]).collect(),
            pair_freqs: self.pair_freqs.project(positions),
        }
    }
}

/// Check that a window of `window_size` tokens fits a document of `tokens` tokens.
pub fn validate_window(window_size: usize, tokens: usize) -> AnalysisResult<()> {
    if window_size == 0 || window_size > tokens {
        return Err(AnalysisError::InvalidWindow {
            window_size,
            tokens,
        });
    }
    Ok(())
}

/// Sweep every window once and accumulate presence counts.
///
/// `slots[i]` is the roster position named by token `i` (see
/// [`Roster::tag`](crate::roster::Roster::tag)); `characters` is the roster
/// size.
#[tracing::instrument(skip(slots), fields(tokens = slots.len()))]
pub fn count_windows(
    slots: &[Option<usize>],
    characters: usize,
    window_size: usize,
) -> AnalysisResult<WindowCounts> {
    validate_window(window_size, slots.len())?;

    let windows = slots.len() - window_size + 1;
    let mut live = vec![0usize; characters];
    let mut char_hits = vec![0u64; characters];
    let mut pair_hits = PairMatrix::filled(characters, 0u64);
    let mut present = Vec::with_capacity(characters);

    for &c in slots[..window_size].iter().flatten() {
        live[c] += 1;
    }

    for start in 0..windows {
        if start > 0 {
            if let Some(leaving) = slots[start - 1] {
                live[leaving] -= 1;
            }
            if let Some(entering) = slots[start + window_size - 1] {
                live[entering] += 1;
            }
        }

        present.clear();
        present.extend((0..characters).filter(|&c| live[c] > 0));

        for &c in &present {
            char_hits[c] += 1;
        }
        if let [alone] = present[..] {
            pair_hits.add_symmetric(alone, alone, 1);
        }
        for (pos, &a) in present.iter().enumerate() {
            for &b in &present[pos + 1..] {
                pair_hits.add_symmetric(a, b, 1);
            }
        }
    }

    let total = windows as f64;
    tracing::debug!(windows, characters, "window sweep complete");
    Ok(WindowCounts {
        windows,
        char_freqs: char_hits.into_iter().map(|h| h as f64 / total).collect(),
        pair_freqs: pair_hits.map(|h| h as f64 / total),
    })
}

/// Fraction of windows containing `name`, by rescanning each window.
///
/// O(n·w); kept as an independent reference for [`count_windows`].
pub fn presence_frequency<S: AsRef<str>>(
    tokens: &[S],
    name: &str,
    window_size: usize,
) -> AnalysisResult<f64> {
    validate_window(window_size, tokens.len())?;
    let windows = tokens.windows(window_size);
    let total = windows.len();
    let hits = windows
        .filter(|w| w.iter().any(|t| t.as_ref() == name))
        .count();
    Ok(hits as f64 / total as f64)
}
