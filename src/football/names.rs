//! Team name normalisation and fuzzy matching.
//!
//! Roster and fixture payloads sometimes disagree on a team's ID while
//! agreeing (loosely) on its name: "Club América" vs "America". Two names
//! match when their normalised forms are equal, when one is a whole-word
//! part of the other, or when their token overlap is high enough.

use std::collections::BTreeSet;

/// Minimum share of the smaller token set that must be shared.
pub const OVERLAP_THRESHOLD: f64 = 0.6;

/// Tokens that carry no identity on their own.
const GENERIC_TOKENS: &[&str] = &[
    "ac", "afc", "as", "cd", "cf", "club", "de", "fc", "sc", "ss", "sv", "the", "us",
];

/// Base letter of an accented lowercase Latin letter.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' | 'ș' => 's',
        'ť' | 'ţ' | 'ț' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Lowercase, strip diacritics and punctuation, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinctive tokens of a name. Generic club words are dropped unless
/// nothing else is left.
pub fn name_tokens(name: &str) -> BTreeSet<String> {
    let normalized = normalize_name(name);
    let all: BTreeSet<String> = normalized.split_whitespace().map(str::to_string).collect();
    let distinctive: BTreeSet<String> = all
        .iter()
        .filter(|t| !GENERIC_TOKENS.contains(&t.as_str()))
        .cloned()
        .collect();
    if distinctive.is_empty() {
        all
    } else {
        distinctive
    }
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

/// Whether two team names refer to the same club.
pub fn names_match(a: &str, b: &str) -> bool {
    let (na, nb) = (normalize_name(a), normalize_name(b));
    if na.is_empty() || nb.is_empty() {
        return false;
    }
    if na == nb || contains_words(&na, &nb) || contains_words(&nb, &na) {
        return true;
    }

    let (ta, tb) = (name_tokens(a), name_tokens(b));
    let smaller = ta.len().min(tb.len());
    if smaller == 0 {
        return false;
    }
    let shared = ta.intersection(&tb).count();
    shared as f64 / smaller as f64 > OVERLAP_THRESHOLD
}
