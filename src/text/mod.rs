//! Text module: transcript → ordered syllable tokens.
//!
//! This module provides:
//! * [`Hyphenator`]: trait implemented by every word-splitting strategy.
//! * [`WordListHyphenator`]: dictionary lookup from `<lang>.json` files.
//! * [`VowelClusterHyphenator`] / [`WholeWordHyphenator`]: fallbacks.
//! * [`HyphenationRegistry`]: caller-owned, append-only dictionary cache.
//! * [`TextSyllabifier`]: tokenises a line and splits its words.
//! * [`TextError`]: error variants for this module.

pub mod hyphenator;
pub mod registry;
pub mod syllabify;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use hyphenator::{Hyphenator, VowelClusterHyphenator, WholeWordHyphenator, WordListHyphenator};
pub use registry::{HyphenationRegistry, FALLBACK_LANGUAGE};
pub use syllabify::{tokenize, TextSyllabifier};

// ---------------------------------------------------------------------------
// TextError
// ---------------------------------------------------------------------------

/// Errors raised while turning text into syllables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextError {
    /// The transcript has no non-whitespace characters.
    #[error("input text is empty")]
    EmptyText,

    /// A dictionary file could not be read or parsed.
    #[error("hyphenation dictionary {path}: {message}")]
    Dictionary { path: String, message: String },
}
