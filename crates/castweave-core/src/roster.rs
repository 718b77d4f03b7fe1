//! Character rosters.

use std::collections::HashMap;

use crate::error::{AnalysisError, AnalysisResult};

/// An ordered set of distinct character names.
///
/// Position in the roster is the index used by every frequency vector and
/// pair matrix of a run; the `name → index` map is built once here and
/// passed around explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl Roster {
    /// Build a roster, rejecting empty lists, blank names and duplicates.
    pub fn new<I, S>(names: I) -> AnalysisResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self {
            names: Vec::new(),
            indices: HashMap::new(),
        };
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(AnalysisError::EmptyCharacterName);
            }
            if roster.indices.contains_key(&name) {
                return Err(AnalysisError::DuplicateCharacter(name));
            }
            roster.indices.insert(name.clone(), roster.names.len());
            roster.names.push(name);
        }
        if roster.names.is_empty() {
            return Err(AnalysisError::EmptyRoster);
        }
        Ok(roster)
    }

    /// Names in roster order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; rosters are never empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Roster position of `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Map each token to the roster slot it names, if any.
    ///
    /// Matching is exact on surface text.
    pub fn tag<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Vec<Option<usize>> {
        tokens.into_iter().map(|t| self.index_of(t)).collect()
    }

    /// Sub-roster made of the given positions, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    pub fn select(&self, positions: &[usize]) -> AnalysisResult<Self> {
        Self::new(positions.iter().map(|&i| self.names[i].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_order() {
        let roster = Roster::new(["Aang", "Sokka", "Zuko"]).unwrap();
        assert_eq!(roster.index_of("Sokka"), Some(1));
        assert_eq!(roster.index_of("Toph"), None);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn rejects_empty_roster() {
        let err = Roster::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyRoster));
    }

    #[test]
    fn rejects_duplicates() {
        let err = Roster::new(["Aang", "Aang"]).unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateCharacter(name) if name == "Aang"));
    }

    #[test]
    fn rejects_blank_names() {
        let err = Roster::new(["Aang", " "]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyCharacterName));
    }

    #[test]
    fn tag_is_case_sensitive() {
        let roster = Roster::new(["Toph"]).unwrap();
        assert_eq!(roster.tag(["Toph", "toph", "rocks"]), vec![Some(0), None, None]);
    }

    #[test]
    fn select_reindexes() {
        let roster = Roster::new(["Aang", "Sokka", "Zuko"]).unwrap();
        let sub = roster.select(&[0, 2]).unwrap();
        assert_eq!(sub.names(), ["Aang", "Zuko"]);
        assert_eq!(sub.index_of("Zuko"), Some(1));
    }
}
