//! Caller-owned cache of per-language hyphenation dictionaries.
//!
//! [`HyphenationRegistry`] loads `<dir>/<language>.json` the first time a
//! language is requested and keeps the result (including "no dictionary")
//! for its own lifetime.  Entries are only ever added, never replaced, so
//! readers sharing an `Arc<HyphenationRegistry>` always see a stable view.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::text::hyphenator::{Hyphenator, WordListHyphenator};

/// Language used when the requested one has no dictionary.
pub const FALLBACK_LANGUAGE: &str = "en";

type Entry = Option<Arc<dyn Hyphenator>>;

/// Per-language dictionary cache.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tts2sv::text::{HyphenationRegistry, Hyphenator, WordListHyphenator};
///
/// let registry = HyphenationRegistry::in_memory();
/// registry.register("en", Arc::new(WordListHyphenator::from_entries(["hel-lo"])));
///
/// let dict = registry.dictionary("en").unwrap();
/// assert_eq!(dict.hyphenate("hello").unwrap(), vec!["hel", "lo"]);
/// // unknown languages fall back to English
/// assert!(registry.dictionary("fr").is_some());
/// ```
pub struct HyphenationRegistry {
    dictionary_dir: Option<PathBuf>,
    entries: RwLock<HashMap<String, Entry>>,
}

impl std::fmt::Debug for HyphenationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyphenationRegistry")
            .field("dictionary_dir", &self.dictionary_dir)
            .finish_non_exhaustive()
    }
}

impl HyphenationRegistry {
    /// Registry that loads dictionaries from `dictionary_dir` on demand.
    pub fn new(dictionary_dir: impl Into<PathBuf>) -> Self {
        Self {
            dictionary_dir: Some(dictionary_dir.into()),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registry that never touches the filesystem; dictionaries must be
    /// added with [`register`](Self::register).
    pub fn in_memory() -> Self {
        Self {
            dictionary_dir: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Directory searched for `<language>.json`, if any.
    pub fn dictionary_dir(&self) -> Option<&Path> {
        self.dictionary_dir.as_deref()
    }

    /// Add a dictionary for `language`.  Returns `false` (and keeps the
    /// existing entry) when the language was already resolved.
    pub fn register(&self, language: &str, hyphenator: Arc<dyn Hyphenator>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(language) {
            return false;
        }
        entries.insert(language.to_string(), Some(hyphenator));
        true
    }

    /// Dictionary for `language`, falling back to [`FALLBACK_LANGUAGE`].
    pub fn dictionary(&self, language: &str) -> Option<Arc<dyn Hyphenator>> {
        self.resolve(language).or_else(|| {
            if language == FALLBACK_LANGUAGE {
                None
            } else {
                self.resolve(FALLBACK_LANGUAGE)
            }
        })
    }

    /// Cached lookup for exactly `language`, loading it on first use.
    fn resolve(&self, language: &str) -> Entry {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(language) {
                return entry.clone();
            }
        }

        let loaded = self.load(language);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // another reader may have won the race; keep whichever landed first
        entries
            .entry(language.to_string())
            .or_insert(loaded)
            .clone()
    }

    fn load(&self, language: &str) -> Entry {
        let dir = self.dictionary_dir.as_ref()?;
        let path = dir.join(format!("{language}.json"));
        if !path.exists() {
            log::debug!("no hyphenation dictionary at {}", path.display());
            return None;
        }
        match WordListHyphenator::load(&path) {
            Ok(dict) => {
                log::info!(
                    "loaded hyphenation dictionary '{language}' ({} words)",
                    dict.len()
                );
                Some(Arc::new(dict))
            }
            Err(e) => {
                log::warn!("ignoring hyphenation dictionary: {e}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_language_file_lazily() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("de.json"), r#"{"wasser": "was-ser"}"#).unwrap();

        let registry = HyphenationRegistry::new(dir.path());
        let dict = registry.dictionary("de").expect("de dictionary");
        assert_eq!(dict.hyphenate("Wasser").unwrap(), vec!["Was", "ser"]);
    }

    #[test]
    fn missing_language_falls_back_to_english() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("en.json"), r#"{"hello": "hel-lo"}"#).unwrap();

        let registry = HyphenationRegistry::new(dir.path());
        let dict = registry.dictionary("xx").expect("english fallback");
        assert_eq!(dict.hyphenate("hello").unwrap(), vec!["hel", "lo"]);
    }

    #[test]
    fn no_dictionaries_at_all() {
        let dir = tempdir().expect("temp dir");
        let registry = HyphenationRegistry::new(dir.path());
        assert!(registry.dictionary("en").is_none());
        assert!(registry.dictionary("fr").is_none());
        assert!(HyphenationRegistry::in_memory().dictionary("en").is_none());
    }

    #[test]
    fn broken_file_is_treated_as_missing() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("en.json"), "not json").unwrap();
        let registry = HyphenationRegistry::new(dir.path());
        assert!(registry.dictionary("en").is_none());
    }

    #[test]
    fn entries_are_append_only() {
        let registry = HyphenationRegistry::in_memory();
        let first = Arc::new(WordListHyphenator::from_entries(["a-b"]));
        let second = Arc::new(WordListHyphenator::from_entries(["c-d"]));

        assert!(registry.register("en", first));
        assert!(!registry.register("en", second));
        let dict = registry.dictionary("en").unwrap();
        assert!(dict.hyphenate("ab").is_some());
        assert!(dict.hyphenate("cd").is_none());
    }

    #[test]
    fn shared_across_threads() {
        let registry = Arc::new(HyphenationRegistry::in_memory());
        registry.register("en", Arc::new(WordListHyphenator::from_entries(["hel-lo"])));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .dictionary("en")
                        .and_then(|d| d.hyphenate("hello"))
                        .map(|parts| parts.len())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(2));
        }
    }
}
