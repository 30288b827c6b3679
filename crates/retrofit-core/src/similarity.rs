//! Bidirectional overlap similarity over significant words.
//!
//! Two fragments denote the same concept when the share of overlapping
//! significant words reaches 80% measured against *either* side. A terse
//! title that is nearly contained in a verbose one therefore matches, even
//! though most of the verbose title is new.
//!
//! # Overlap
//!
//! The overlap from `a` into `b` counts every token of `a` that also occurs in
//! `b`, so a repeated shared word counts each time it appears in `a`. With
//! repeated words that count depends on direction, so both directions are
//! evaluated and either one may establish the match. This keeps the predicate
//! symmetric for all inputs.
//!
//! An empty signature never matches anything, including another empty one.

use crate::text::significant_words;

/// Fixed similarity threshold (0.8), stored as an exact ratio so that the
/// boundary is compared in integers: `overlap / len ≥ 4 / 5`.
const THRESHOLD_NUMERATOR: usize = 4;
const THRESHOLD_DENOMINATOR: usize = 5;

/// The similarity threshold as a float, for display.
pub const SIMILARITY_THRESHOLD: f64 = THRESHOLD_NUMERATOR as f64 / THRESHOLD_DENOMINATOR as f64;

/// Whether `a` and `b` denote the same concept.
pub fn is_similar(a: &str, b: &str) -> bool {
    words_similar(&significant_words(a), &significant_words(b))
}

/// [`is_similar`] over pre-computed significant-word sequences.
///
/// Callers comparing one fragment against many should compute the word
/// sequences once and use this directly.
pub fn words_similar(a: &[String], b: &[String]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    directional_match(a, b) || directional_match(b, a)
}

/// Overlap ratio test with the overlap counted from `from` into `into`.
fn directional_match(from: &[String], into: &[String]) -> bool {
    let shared = overlap(from, into);
    reaches_threshold(shared, from.len()) || reaches_threshold(shared, into.len())
}

/// Number of tokens in `from` that also occur somewhere in `into`.
pub fn overlap(from: &[String], into: &[String]) -> usize {
    from.iter().filter(|w| into.contains(w)).count()
}

fn reaches_threshold(shared: usize, len: usize) -> bool {
    len > 0 && shared * THRESHOLD_DENOMINATOR >= len * THRESHOLD_NUMERATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i:02}")).collect()
    }

    fn join(words: &[String]) -> String {
        words.join(" ")
    }

    #[test]
    fn subset_title_matches_longer_title() {
        assert!(is_similar(
            "Debugging Root Causes",
            "Debugging Wrong Root Causes"
        ));
    }

    #[test]
    fn disjoint_titles_do_not_match() {
        assert!(!is_similar("CSS Scoping Issues", "SQL Query Failures"));
    }

    #[test]
    fn paraphrased_rule_matches() {
        assert!(is_similar(
            "Always check imports before adding new ones.",
            "Always check your imports before you add any new ones to the project."
        ));
    }

    #[test]
    fn one_word_substitution_in_five_matches() {
        assert!(is_similar(
            "Incorrect CSS scoping component styles",
            "Wrong CSS scoping component styles"
        ));
    }

    #[test]
    fn empty_side_never_matches() {
        for text in ["", "anything at all", "the and", "Debugging Root Causes"] {
            assert!(!is_similar(text, ""));
            assert!(!is_similar("", text));
        }
        assert!(!is_similar("the of and", "with your them"));
    }

    #[test]
    fn identical_text_matches() {
        assert!(is_similar("Flaky integration tests", "flaky INTEGRATION tests!"));
    }

    #[test]
    fn ratio_exactly_at_threshold_matches() {
        // 4 shared of 5 on both sides.
        let mut a = tokens("shared", 4);
        let mut b = a.clone();
        a.push("onlyina".into());
        b.push("onlyinb".into());
        assert!(is_similar(&join(&a), &join(&b)));
    }

    #[test]
    fn ratio_just_below_threshold_does_not_match() {
        // 15 shared of 19 on both sides: 0.789...
        let shared = tokens("common", 15);
        let mut a = shared.clone();
        let mut b = shared;
        a.extend(tokens("left", 4));
        b.extend(tokens("right", 4));
        assert!(!is_similar(&join(&a), &join(&b)));
    }

    #[test]
    fn ratio_below_on_one_side_above_on_other_matches() {
        // 3 of 3 against 3 of 10.
        let a = tokens("core", 3);
        let mut b = a.clone();
        b.extend(tokens("extra", 7));
        assert!(is_similar(&join(&a), &join(&b)));
        assert!(is_similar(&join(&b), &join(&a)));
    }

    #[test]
    fn symmetric_over_sample_pairs() {
        let samples = [
            "",
            "Debugging Root Causes",
            "Debugging Wrong Root Causes",
            "CSS Scoping Issues",
            "SQL Query Failures",
            "query query query query failures",
            "query alpha bravo charlie delta",
            "Always check imports before adding new ones.",
            "Always check your imports before you add any new ones to the project.",
            "the and with",
        ];
        for a in samples {
            for b in samples {
                assert_eq!(is_similar(a, b), is_similar(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn repeated_words_do_not_break_symmetry() {
        // Counted from the left, 4 of 5 overlap; counted from the right, 1 of 5.
        let a = "query query query query failures";
        let b = "query alpha bravo charlie delta";
        assert!(is_similar(a, b));
        assert!(is_similar(b, a));
    }

    #[test]
    fn overlap_counts_repeats_from_source_side() {
        let a: Vec<String> = ["retry", "retry", "build"].map(String::from).to_vec();
        let b: Vec<String> = ["retry", "deploy"].map(String::from).to_vec();
        assert_eq!(overlap(&a, &b), 2);
        assert_eq!(overlap(&b, &a), 1);
    }

    #[test]
    fn threshold_constant_is_point_eight() {
        assert!((SIMILARITY_THRESHOLD - 0.8).abs() < f64::EPSILON);
    }
}
