//! Transcript → ordered syllable / punctuation tokens.
//!
//! Tokens are maximal runs of word characters (alphanumeric or `_`) or single
//! non-space symbols.  Purely ASCII-alphabetic tokens are split into
//! syllables, first through the language dictionary and then through the
//! configured fallback heuristic; every other token passes through as is.

use std::sync::Arc;

use crate::config::{FallbackStrategy, TextConfig};
use crate::text::hyphenator::{Hyphenator, VowelClusterHyphenator, WholeWordHyphenator};
use crate::text::registry::HyphenationRegistry;
use crate::text::TextError;

/// Split `text` into word and punctuation tokens.
///
/// ```rust
/// use tts2sv::text::tokenize;
///
/// assert_eq!(tokenize("Hello, world!"), vec!["Hello", ",", "world", "!"]);
/// ```
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        if c.is_alphanumeric() || c == '_' {
            word_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(&text[start..idx]);
        }
        if !c.is_whitespace() {
            tokens.push(&text[idx..idx + c.len_utf8()]);
        }
    }
    if let Some(start) = word_start {
        tokens.push(&text[start..]);
    }
    tokens
}

fn is_plain_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic())
}

// ---------------------------------------------------------------------------
// TextSyllabifier
// ---------------------------------------------------------------------------

/// Splits a line of text into the syllables that will be sung.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tts2sv::text::{HyphenationRegistry, TextSyllabifier, VowelClusterHyphenator};
///
/// let syllabifier = TextSyllabifier::new(
///     "en",
///     Arc::new(HyphenationRegistry::in_memory()),
///     Box::new(VowelClusterHyphenator),
/// );
/// assert_eq!(
///     syllabifier.syllabify("Hello, world!").unwrap(),
///     vec!["Hel", "lo", ",", "world", "!"]
/// );
/// ```
pub struct TextSyllabifier {
    language: String,
    registry: Arc<HyphenationRegistry>,
    fallback: Box<dyn Hyphenator>,
}

impl std::fmt::Debug for TextSyllabifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSyllabifier")
            .field("language", &self.language)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl TextSyllabifier {
    pub fn new(
        language: impl Into<String>,
        registry: Arc<HyphenationRegistry>,
        fallback: Box<dyn Hyphenator>,
    ) -> Self {
        Self {
            language: language.into(),
            registry,
            fallback,
        }
    }

    /// Build from the `[text]` settings section with a fresh registry over
    /// the configured dictionary directory.
    pub fn from_config(config: &TextConfig) -> Self {
        let registry = Arc::new(HyphenationRegistry::new(config.resolved_dictionary_dir()));
        Self::with_registry(config, registry)
    }

    /// Build from the `[text]` settings section sharing `registry`.
    pub fn with_registry(config: &TextConfig, registry: Arc<HyphenationRegistry>) -> Self {
        let fallback: Box<dyn Hyphenator> = match config.fallback {
            FallbackStrategy::VowelCluster => Box::new(VowelClusterHyphenator),
            FallbackStrategy::WholeWord => Box::new(WholeWordHyphenator),
        };
        Self::new(config.language.clone(), registry, fallback)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Ordered syllable and punctuation tokens for `text`.
    ///
    /// # Errors
    ///
    /// [`TextError::EmptyText`] when `text` is empty or only whitespace.
    pub fn syllabify(&self, text: &str) -> Result<Vec<String>, TextError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TextError::EmptyText);
        }

        let dictionary = self.registry.dictionary(&self.language);
        let mut syllables = Vec::new();
        for token in tokenize(text) {
            if is_plain_word(token) {
                syllables.extend(self.syllabify_word(token, dictionary.as_deref()));
            } else {
                syllables.push(token.to_string());
            }
        }
        log::debug!("syllabified {} chars into {} tokens", text.len(), syllables.len());
        Ok(syllables)
    }

    fn syllabify_word(&self, word: &str, dictionary: Option<&dyn Hyphenator>) -> Vec<String> {
        dictionary
            .and_then(|d| d.hyphenate(word))
            .or_else(|| self.fallback.hyphenate(word))
            .map(|parts| parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty())
            .unwrap_or_else(|| vec![word.to_string()])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::WordListHyphenator;

    fn heuristic() -> TextSyllabifier {
        TextSyllabifier::new(
            "en",
            Arc::new(HyphenationRegistry::in_memory()),
            Box::new(VowelClusterHyphenator),
        )
    }

    #[test]
    fn tokenize_separates_punctuation() {
        assert_eq!(tokenize("  don't stop  "), vec!["don", "'", "t", "stop"]);
        assert_eq!(tokenize("a1_b?!"), vec!["a1_b", "?", "!"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn syllables_without_dictionary() {
        let result = heuristic().syllabify("Hello, world!").unwrap();
        assert_eq!(result, vec!["Hel", "lo", ",", "world", "!"]);
    }

    #[test]
    fn dictionary_takes_precedence() {
        let registry = Arc::new(HyphenationRegistry::in_memory());
        registry.register("en", Arc::new(WordListHyphenator::from_entries(["he-llo"])));
        let syllabifier =
            TextSyllabifier::new("en", registry, Box::new(VowelClusterHyphenator));

        assert_eq!(syllabifier.syllabify("Hello").unwrap(), vec!["He", "llo"]);
        // unknown word → heuristic
        assert_eq!(syllabifier.syllabify("banana").unwrap(), vec!["ba", "na", "na"]);
    }

    #[test]
    fn non_ascii_and_digit_tokens_pass_through() {
        let result = heuristic().syllabify("café 42 times").unwrap();
        assert_eq!(result, vec!["café", "42", "ti", "mes"]);
    }

    #[test]
    fn whole_word_strategy_from_config() {
        let config = TextConfig {
            fallback: FallbackStrategy::WholeWord,
            ..TextConfig::default()
        };
        let syllabifier =
            TextSyllabifier::with_registry(&config, Arc::new(HyphenationRegistry::in_memory()));
        assert_eq!(
            syllabifier.syllabify("Hello there").unwrap(),
            vec!["Hello", "there"]
        );
    }

    #[test]
    fn empty_text_rejected() {
        assert!(matches!(heuristic().syllabify("  \n "), Err(TextError::EmptyText)));
        assert!(matches!(heuristic().syllabify(""), Err(TextError::EmptyText)));
    }
}
