//! Significant-word extraction for fuzzy text identity.
//!
//! Every comparison in retrofit is built on the same vocabulary primitive:
//! a text fragment reduced to its ordered sequence of significant words.
//!
//! # Normalisation
//!
//! 1. Lower-case the input.
//! 2. Strip every character outside `[a-z0-9]` and whitespace, so punctuation
//!    can neither split nor join tokens (`"don't"` becomes `"dont"`).
//! 3. Split on whitespace runs.
//! 4. Drop tokens of length ≤ 2 and tokens in [`STOP_WORDS`].
//!
//! There is no stemming: `"configuration"` and `"configurations"` are distinct
//! tokens. Duplicates are preserved because overlap counting depends on them.

/// Tokens this short carry no identity.
const MAX_INSIGNIFICANT_LEN: usize = 2;

/// Closed list of function words ignored during comparison.
///
/// Articles, prepositions, auxiliary verbs, pronouns and common connectives.
/// Only entries longer than two characters matter; shorter tokens are already
/// dropped by length.
pub const STOP_WORDS: &[&str] = &[
    // Articles, determiners
    "the", "this", "that", "these", "those", "any", "all", "each", "every", "some", "such",
    // Prepositions
    "about", "above", "across", "after", "against", "along", "among", "around", "before",
    "behind", "below", "beneath", "beside", "between", "beyond", "during", "for", "from",
    "into", "onto", "over", "per", "since", "through", "toward", "towards", "under", "until",
    "upon", "via", "with", "within", "without",
    // Auxiliary and modal verbs
    "are", "was", "were", "been", "being", "has", "have", "had", "having", "does", "did",
    "doing", "can", "could", "will", "would", "shall", "should", "may", "might", "must",
    // Pronouns
    "you", "your", "yours", "they", "them", "their", "theirs", "its", "our", "ours", "him",
    "her", "his", "hers", "she", "who", "whom", "whose", "what", "which",
    // Connectives
    "and", "but", "nor", "yet", "also", "because", "than", "then", "there", "here", "when",
    "where", "while", "whether", "though", "although", "unless", "not", "just", "very",
];

/// Reduce `text` to its ordered sequence of significant words.
///
/// Returns an empty vector for empty, pure-punctuation, or pure-stop-word input.
pub fn significant_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| w.len() > MAX_INSIGNIFICANT_LEN && !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

/// Whether `word` (already lower-cased) is in [`STOP_WORDS`].
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
