//! Per-character occurrence index lists.

/// Ascending token positions at which each roster character appears.
///
/// Built in one pass over the tagged tokens and shared by every pair
/// comparison of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceIndex {
    lists: Vec<Vec<usize>>,
}

impl OccurrenceIndex {
    /// Collect positions from roster-tagged tokens.
    pub fn build(slots: &[Option<usize>], characters: usize) -> Self {
        let mut lists = vec![Vec::new(); characters];
        for (position, slot) in slots.iter().enumerate() {
            if let Some(c) = *slot {
                lists[c].push(position);
            }
        }
        Self { lists }
    }

    /// Positions of character `index`, strictly ascending.
    pub fn positions(&self, index: usize) -> &[usize] {
        &self.lists[index]
    }

    /// Number of mentions of character `index`.
    pub fn mentions(&self, index: usize) -> usize {
        self.lists[index].len()
    }

    /// Number of characters indexed.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether no characters are indexed.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_positions_in_order() {
        let slots = [Some(1), None, Some(0), Some(1), None, Some(1)];
        let index = OccurrenceIndex::build(&slots, 3);
        assert_eq!(index.positions(0), [2]);
        assert_eq!(index.positions(1), [0, 3, 5]);
        assert!(index.positions(2).is_empty());
        assert_eq!(index.mentions(1), 3);
        assert!(index.positions(1).windows(2).all(|w| w[0] < w[1]));
    }
}
