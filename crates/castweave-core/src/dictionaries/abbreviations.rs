//! Abbreviations that end in a period without ending a sentence.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Lowercase abbreviations, without their final period.
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Forms of address and rank, common in fiction
    set.extend([
        "mr", "mrs", "ms", "mx", "dr", "prof", "rev", "fr", "sr", "jr", "st", "hon", "capt",
        "cmdr", "col", "gen", "lt", "maj", "sgt", "cpl", "adm", "gov", "pres", "sen", "rep", "mme",
        "mlle", "messrs",
    ]);

    // Latin and scholarly shorthand
    set.extend([
        "etc", "vs", "e.g", "i.e", "cf", "viz", "al", "ibid", "n.b", "p.s", "approx", "ca",
    ]);

    // Calendar
    set.extend([
        "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "mon",
        "tue", "tues", "wed", "thu", "thurs", "fri", "sat", "sun", "a.m", "p.m",
    ]);

    // Places and units
    set.extend([
        "ave", "blvd", "rd", "mt", "ft", "no", "vol", "ch", "pp", "fig",
    ]);

    set
});

/// Whether `word` (lowercase, trailing period removed) is a known abbreviation.
pub fn is_abbreviation(word: &str) -> bool {
    ABBREVIATIONS.contains(word)
}
