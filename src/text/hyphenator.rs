//! The [`Hyphenator`] capability and its implementations.
//!
//! | Type | Knows | Used as |
//! |------|-------|---------|
//! | [`WordListHyphenator`] | words listed in a `<lang>.json` dictionary | primary lookup |
//! | [`VowelClusterHyphenator`] | any word (heuristic) | default fallback |
//! | [`WholeWordHyphenator`] | any word (no split) | alternative fallback |

use std::collections::HashMap;
use std::path::Path;

use crate::text::TextError;

// ---------------------------------------------------------------------------
// Hyphenator trait
// ---------------------------------------------------------------------------

/// Splits a single word into syllables.
///
/// Returns `None` when the implementation has no opinion about `word`, so the
/// caller can try the next strategy.
pub trait Hyphenator: Send + Sync {
    fn hyphenate(&self, word: &str) -> Option<Vec<String>>;
}

// Compile-time assertion: Box<dyn Hyphenator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Hyphenator>) {}
};

// ---------------------------------------------------------------------------
// VowelClusterHyphenator
// ---------------------------------------------------------------------------

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Consonant–vowel–consonant cluster heuristic.
///
/// Each syllable is a run of consonants, a run of vowels, and one more
/// consonant when that consonant is followed by another consonant or ends the
/// word.  Trailing consonants that start no new syllable stick to the last
/// one; a word without vowels is a single syllable.
///
/// ```rust
/// use tts2sv::text::{Hyphenator, VowelClusterHyphenator};
///
/// let h = VowelClusterHyphenator;
/// assert_eq!(h.hyphenate("Hello").unwrap(), vec!["Hel", "lo"]);
/// assert_eq!(h.hyphenate("world").unwrap(), vec!["world"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VowelClusterHyphenator;

impl Hyphenator for VowelClusterHyphenator {
    fn hyphenate(&self, word: &str) -> Option<Vec<String>> {
        let chars: Vec<char> = word.chars().collect();
        let n = chars.len();
        let mut parts: Vec<String> = Vec::new();
        let mut pos = 0;

        while pos < n {
            let mut i = pos;
            while i < n && !is_vowel(chars[i]) {
                i += 1;
            }
            if i == n {
                break;
            }
            while i < n && is_vowel(chars[i]) {
                i += 1;
            }
            if i < n && !is_vowel(chars[i]) && (i + 1 == n || !is_vowel(chars[i + 1])) {
                i += 1;
            }
            parts.push(chars[pos..i].iter().collect());
            pos = i;
        }

        match parts.last_mut() {
            None => return Some(vec![word.to_string()]),
            Some(last) => last.extend(&chars[pos..]),
        }
        Some(parts)
    }
}

// ---------------------------------------------------------------------------
// WholeWordHyphenator
// ---------------------------------------------------------------------------

/// Keeps every word in one piece.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeWordHyphenator;

impl Hyphenator for WholeWordHyphenator {
    fn hyphenate(&self, word: &str) -> Option<Vec<String>> {
        Some(vec![word.to_string()])
    }
}

// ---------------------------------------------------------------------------
// WordListHyphenator
// ---------------------------------------------------------------------------

/// Dictionary of known hyphenations, e.g. `{"hello": "hel-lo"}`.
///
/// Lookups ignore case and keep the caller's spelling: `"HELLO"` becomes
/// `["HEL", "LO"]`.  Words that are missing, or whose entry has no hyphen,
/// yield `None`.
#[derive(Debug, Clone, Default)]
pub struct WordListHyphenator {
    /// Lower-cased word → character offsets where a new syllable starts.
    breaks: HashMap<String, Vec<usize>>,
}

impl WordListHyphenator {
    /// Build from hyphenated spellings such as `"hel-lo"`.  The lookup key is
    /// the spelling with its hyphens removed.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut breaks = HashMap::new();
        for hyphenated in entries {
            let mut key = String::new();
            let mut offsets = Vec::new();
            for c in hyphenated.as_ref().trim().chars() {
                if c == '-' {
                    let at = key.chars().count();
                    if at > 0 && offsets.last() != Some(&at) {
                        offsets.push(at);
                    }
                } else {
                    key.extend(c.to_lowercase());
                }
            }
            // a trailing hyphen adds no syllable
            let len = key.chars().count();
            offsets.retain(|&o| o < len);
            if !key.is_empty() {
                breaks.insert(key, offsets);
            }
        }
        Self { breaks }
    }

    /// Load a JSON object of `word → "hy-phen-ated"` pairs.
    pub fn load(path: &Path) -> Result<Self, TextError> {
        let content = std::fs::read_to_string(path).map_err(|e| TextError::Dictionary {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let map: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|e| TextError::Dictionary {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(map.values()))
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.breaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }
}

impl Hyphenator for WordListHyphenator {
    fn hyphenate(&self, word: &str) -> Option<Vec<String>> {
        let offsets = self.breaks.get(&word.to_lowercase())?;
        if offsets.is_empty() {
            return None;
        }
        let chars: Vec<char> = word.chars().collect();
        if offsets.last().is_some_and(|&o| o >= chars.len()) {
            return None;
        }

        let mut parts = Vec::with_capacity(offsets.len() + 1);
        let mut start = 0;
        for &end in offsets {
            parts.push(chars[start..end].iter().collect());
            start = end;
        }
        parts.push(chars[start..].iter().collect());
        Some(parts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn split(word: &str) -> Vec<String> {
        VowelClusterHyphenator.hyphenate(word).unwrap()
    }

    #[test]
    fn cluster_heuristic_examples() {
        assert_eq!(split("Hello"), vec!["Hel", "lo"]);
        assert_eq!(split("world"), vec!["world"]);
        assert_eq!(split("banana"), vec!["ba", "na", "na"]);
        assert_eq!(split("syllable"), vec!["syl", "lab", "le"]);
        assert_eq!(split("strength"), vec!["strength"]);
    }

    #[test]
    fn word_without_vowels_is_one_syllable() {
        assert_eq!(split("hmm"), vec!["hmm"]);
    }

    #[test]
    fn cluster_pieces_rejoin_to_word() {
        for word in ["Tomorrow", "alignment", "queue", "rhythm", "a"] {
            assert_eq!(split(word).concat(), word);
        }
    }

    #[test]
    fn whole_word_never_splits() {
        assert_eq!(
            WholeWordHyphenator.hyphenate("banana").unwrap(),
            vec!["banana"]
        );
    }

    #[test]
    fn word_list_keeps_caller_casing() {
        let dict = WordListHyphenator::from_entries(["hel-lo", "beau-ti-ful"]);
        assert_eq!(dict.hyphenate("HELLO").unwrap(), vec!["HEL", "LO"]);
        assert_eq!(
            dict.hyphenate("Beautiful").unwrap(),
            vec!["Beau", "ti", "ful"]
        );
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn word_list_without_hyphen_or_entry_defers() {
        let dict = WordListHyphenator::from_entries(["cat"]);
        assert!(dict.hyphenate("cat").is_none());
        assert!(dict.hyphenate("dog").is_none());
    }

    #[test]
    fn word_list_ignores_stray_hyphens() {
        let dict = WordListHyphenator::from_entries(["-wa--ter-"]);
        assert_eq!(dict.hyphenate("water").unwrap(), vec!["wa", "ter"]);
    }

    #[test]
    fn load_from_json_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("en.json");
        std::fs::write(&path, r#"{"hello": "hel-lo", "table": "ta-ble"}"#).unwrap();

        let dict = WordListHyphenator::load(&path).expect("load");
        assert_eq!(dict.hyphenate("table").unwrap(), vec!["ta", "ble"]);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("en.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            WordListHyphenator::load(&path),
            Err(TextError::Dictionary { .. })
        ));
    }
}
