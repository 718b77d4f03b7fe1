//! Proximity regions between two characters.
//!
//! [`find_overlaps`] walks two ascending occurrence lists together, the way
//! a merge join does, and reports every maximal run of consecutive
//! comparisons in which the two current positions sit less than a window
//! apart.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Inclusive token range where two characters are within a window of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OverlapRange {
    /// First token index of the region.
    pub begin: usize,
    /// Last token index of the region (inclusive).
    pub end: usize,
}

/// Find maximal proximity regions between occurrence lists `a` and `b`.
///
/// At each step the pointer whose *next* element is smaller advances (once
/// one list is on its last element only the other advances), and the pair
/// under both pointers is tested for `|x - y| < window_size`. A matching pair
/// opens or extends the current region; a non-matching pair closes it. The
/// final pair is always tested before the sweep stops.
///
/// Either list being empty yields no regions.
///
/// # Panics
///
/// Panics if either list is not strictly ascending.
pub fn find_overlaps(a: &[usize], b: &[usize], window_size: usize) -> Vec<OverlapRange> {
    assert_ascending(a);
    assert_ascending(b);

    let mut ranges = Vec::new();
    let (Some(last_a), Some(last_b)) = (a.len().checked_sub(1), b.len().checked_sub(1)) else {
        return ranges;
    };

    let (mut i, mut j) = (0, 0);
    let mut open: Option<OverlapRange> = None;
    loop {
        let (x, y) = (a[i], b[j]);
        if x.abs_diff(y) < window_size {
            let (low, high) = (x.min(y), x.max(y));
            match open.as_mut() {
                Some(range) => range.end = range.end.max(high),
                None => {
                    open = Some(OverlapRange {
                        begin: low,
                        end: high,
                    });
                }
            }
        } else if let Some(range) = open.take() {
            ranges.push(range);
        }

        if i == last_a && j == last_b {
            break;
        }
        if i == last_a {
            j += 1;
        } else if j == last_b || a[i + 1] < b[j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    ranges.extend(open);
    ranges
}

fn assert_ascending(positions: &[usize]) {
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "occurrence positions must be strictly ascending"
    );
}
