//! Built-in valence lexicon.
//!
//! Valences use the -4..=4 intensity scale common to rule-based sentiment
//! lexicons. Booster words scale the next valenced word; negators flip it.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Word → valence in `-4.0..=4.0`.
pub static VALENCES: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        // Warmth and affection
        ("love", 3.2),
        ("loved", 2.9),
        ("loves", 2.7),
        ("loving", 2.9),
        ("beloved", 2.5),
        ("adore", 2.7),
        ("affection", 2.4),
        ("kiss", 1.8),
        ("kissed", 1.6),
        ("hug", 2.1),
        ("hugged", 2.0),
        ("embrace", 1.9),
        ("embraced", 1.8),
        ("friend", 2.2),
        ("friends", 2.1),
        ("friendship", 2.4),
        ("trust", 2.3),
        ("trusted", 2.1),
        ("together", 1.0),
        ("gentle", 1.8),
        ("gently", 1.6),
        ("warm", 1.5),
        ("warmth", 1.8),
        ("care", 2.2),
        ("cared", 2.0),
        ("caring", 2.3),
        ("kind", 2.4),
        ("kindness", 2.5),
        ("sweet", 2.0),
        ("tender", 1.9),
        ("forgive", 1.8),
        ("forgave", 1.7),
        ("thank", 1.5),
        ("thanks", 1.9),
        ("grateful", 2.5),
        ("proud", 2.1),
        ("honor", 2.2),
        ("honour", 2.2),
        ("loyal", 2.1),
        ("protect", 1.6),
        ("protected", 1.5),
        ("safe", 1.9),
        ("save", 2.2),
        ("saved", 1.8),
        ("help", 1.7),
        ("helped", 1.6),
        ("peace", 2.5),
        ("peaceful", 2.2),
        ("calm", 1.3),
        // Joy
        ("happy", 2.7),
        ("happiness", 2.6),
        ("joy", 2.8),
        ("joyful", 2.9),
        ("glad", 2.0),
        ("smile", 1.5),
        ("smiled", 1.5),
        ("smiling", 1.6),
        ("grin", 1.4),
        ("grinned", 1.4),
        ("laugh", 2.6),
        ("laughed", 2.0),
        ("laughing", 2.2),
        ("laughter", 2.2),
        ("fun", 2.3),
        ("excited", 1.4),
        ("delight", 2.9),
        ("delighted", 2.8),
        ("good", 1.9),
        ("great", 3.1),
        ("wonderful", 2.7),
        ("amazing", 2.8),
        ("awesome", 3.1),
        ("beautiful", 2.9),
        ("brilliant", 2.8),
        ("perfect", 2.7),
        ("nice", 1.8),
        ("fine", 0.8),
        ("best", 3.2),
        ("better", 1.9),
        ("hope", 1.9),
        ("hopeful", 2.3),
        ("win", 2.8),
        ("won", 2.7),
        ("victory", 2.8),
        ("relief", 1.8),
        ("relieved", 1.6),
        ("yes", 1.7),
        ("brave", 2.4),
        ("courage", 2.2),
        ("strong", 2.3),
        // Hostility
        ("hate", -2.7),
        ("hated", -3.2),
        ("hates", -1.9),
        ("hatred", -3.2),
        ("enemy", -2.5),
        ("enemies", -2.2),
        ("angry", -2.3),
        ("anger", -2.7),
        ("rage", -2.6),
        ("furious", -2.7),
        ("fury", -2.7),
        ("glare", -1.6),
        ("glared", -1.5),
        ("scowl", -1.2),
        ("scowled", -1.2),
        ("yell", -1.5),
        ("yelled", -1.5),
        ("shout", -1.0),
        ("shouted", -0.9),
        ("scream", -1.7),
        ("screamed", -1.6),
        ("fight", -1.6),
        ("fought", -1.5),
        ("fighting", -1.5),
        ("attack", -2.1),
        ("attacked", -2.1),
        ("hit", -1.4),
        ("punch", -1.6),
        ("punched", -1.6),
        ("kill", -3.7),
        ("killed", -3.5),
        ("murder", -3.7),
        ("war", -2.9),
        ("destroy", -2.6),
        ("destroyed", -2.5),
        ("betray", -3.2),
        ("betrayed", -3.0),
        ("betrayal", -3.1),
        ("traitor", -3.0),
        ("lie", -1.8),
        ("lied", -1.6),
        ("liar", -2.6),
        ("cruel", -2.8),
        ("threat", -2.4),
        ("threatened", -2.0),
        ("banished", -2.2),
        ("burn", -1.5),
        ("burned", -1.7),
        ("scar", -1.3),
        ("scarred", -1.7),
        ("blame", -1.4),
        ("blamed", -1.4),
        // Distress
        ("sad", -2.1),
        ("sadness", -1.9),
        ("sorrow", -2.4),
        ("cry", -2.1),
        ("cried", -1.6),
        ("crying", -2.1),
        ("tears", -0.9),
        ("grief", -2.2),
        ("mourn", -1.8),
        ("pain", -2.3),
        ("painful", -2.4),
        ("hurt", -2.4),
        ("hurts", -2.1),
        ("suffer", -2.3),
        ("alone", -1.0),
        ("lonely", -1.5),
        ("afraid", -2.2),
        ("fear", -2.2),
        ("feared", -2.2),
        ("scared", -2.2),
        ("terrified", -3.0),
        ("worried", -1.2),
        ("worry", -1.9),
        ("guilt", -1.8),
        ("guilty", -1.8),
        ("ashamed", -2.1),
        ("shame", -2.1),
        ("sorry", -0.3),
        ("regret", -1.8),
        ("lost", -1.3),
        ("lose", -1.7),
        ("failed", -2.3),
        ("failure", -2.3),
        ("bad", -2.5),
        ("worse", -2.1),
        ("worst", -3.1),
        ("terrible", -2.1),
        ("horrible", -2.5),
        ("awful", -2.0),
        ("dead", -3.3),
        ("death", -2.9),
        ("die", -2.9),
        ("died", -2.6),
        ("dying", -2.9),
        ("no", -1.2),
        ("tired", -1.9),
        ("annoyed", -1.6),
        ("annoying", -1.7),
        ("stupid", -2.4),
        ("idiot", -2.3),
        ("jerk", -2.0),
        ("weak", -1.9),
    ]
    .into_iter()
    .collect()
});

/// Intensifiers and dampeners → scalar added to the following valence magnitude.
pub static BOOSTERS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        ("very", 0.293),
        ("really", 0.293),
        ("so", 0.293),
        ("extremely", 0.293),
        ("incredibly", 0.293),
        ("absolutely", 0.293),
        ("completely", 0.293),
        ("deeply", 0.293),
        ("totally", 0.293),
        ("truly", 0.293),
        ("utterly", 0.293),
        ("barely", -0.293),
        ("hardly", -0.293),
        ("slightly", -0.293),
        ("somewhat", -0.293),
        ("kinda", -0.293),
        ("almost", -0.293),
    ]
    .into_iter()
    .collect()
});

/// Words that flip the polarity of a valenced word shortly after them.
pub static NEGATORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "not", "never", "no", "nothing", "nobody", "none", "neither", "nor", "without", "cannot",
        "can't", "don't", "didn't", "doesn't", "won't", "wasn't", "weren't", "isn't", "aren't",
        "couldn't", "wouldn't", "shouldn't", "n't",
    ]
    .into_iter()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valences_within_scale() {
        assert!(VALENCES.values().all(|v| (-4.0..=4.0).contains(v)));
    }

    #[test]
    fn boosters_and_negators_are_not_valenced_twice() {
        assert!(BOOSTERS.keys().all(|w| !VALENCES.contains_key(w)));
    }
}
