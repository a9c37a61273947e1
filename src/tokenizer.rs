//! Name tokenization for the lexical index.
//!
//! Names are split on whitespace and lowercased; nothing more. Unicode word
//! characters are preserved as-is (no transliteration), since query strings
//! may themselves contain non-ASCII scripts.

use crate::types::Record;
use rustc_hash::FxHashSet;

/// Normalize a name into its set of lowercase word tokens.
///
/// Duplicates collapse; empty or whitespace-only input yields an empty set.
///
/// # Examples
///
/// ```rust
/// use gazetteer::tokenizer::tokenize;
///
/// let tokens = tokenize("New York City");
/// assert!(tokens.contains("new"));
/// assert!(tokens.contains("york"));
/// assert!(tokens.contains("city"));
///
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(name: &str) -> FxHashSet<String> {
    name.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Union of [`tokenize`] over every name field of a record: the primary
/// name, the ASCII name (if present), and each alternate name.
///
/// Set semantics are an invariant here: a record must not be double-counted
/// for a token repeated across multiple name fields.
pub fn tokenize_record(record: &Record) -> FxHashSet<String> {
    let mut tokens = tokenize(&record.name);

    if let Some(ascii_name) = &record.ascii_name {
        tokens.extend(tokenize(ascii_name));
    }

    for alternate in &record.alternate_names {
        tokens.extend(tokenize(alternate));
    }

    tokens
}
