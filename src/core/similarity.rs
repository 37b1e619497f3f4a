//! Token-set similarity
//!
//! Scores two strings 0-100 by comparing their word sets, so word order and
//! repeated words do not matter. A keyword whose words all appear in the input
//! scores 100.

use std::collections::BTreeSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_NON_WORD: Regex = Regex::new(r"\W+").unwrap();
    static ref RE_WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Lowercase, turn punctuation into spaces, trim
pub fn preprocess(text: &str) -> String {
    RE_NON_WORD
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Whole-word tokens of `text`, in order
pub fn tokenize(text: &str) -> Vec<&str> {
    RE_WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Indel similarity, 0-100: matched characters over total length.
///
/// Twice the longest common subsequence divided by the combined length, rounded
/// half to even. Empty on either side scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let total = a.len() + b.len();
    round_half_even(200 * common_subsequence_len(&a, &b), total) as u8
}

/// Length of the longest common subsequence, one DP row at a time
fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb { diagonal + 1 } else { above.max(row[j]) };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// `numerator / denominator` rounded to the nearest integer, ties to even
fn round_half_even(numerator: usize, denominator: usize) -> usize {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Order- and duplicate-insensitive similarity, 0-100
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(tokens_a.intersection(&tokens_b).copied());
    let diff_ab = join(tokens_a.difference(&tokens_b).copied());
    let diff_ba = join(tokens_b.difference(&tokens_a).copied());

    let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

    [
        ratio(&sect, &combined_ab),
        ratio(&sect, &combined_ba),
        ratio(&combined_ab, &combined_ba),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

fn join<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_contained_in_input() {
        assert_eq!(token_set_ratio("jam buka lab", "buka"), 100);
        assert_eq!(token_set_ratio("apa sanksi kalau telat", "sanksi"), 100);
        assert_eq!(token_set_ratio("kapan hari kerja lab", "hari kerja"), 100);
    }

    #[test]
    fn test_order_and_duplicates_ignored() {
        assert_eq!(token_set_ratio("buka jam", "jam buka"), 100);
        assert_eq!(token_set_ratio("buka buka jam", "jam buka"), 100);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("spesifikasi pc", "komputer"), ("jadwl", "jadwal"), ("xyz", "mysql")];
        for (a, b) in pairs {
            assert_eq!(token_set_ratio(a, b), token_set_ratio(b, a), "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_unrelated_scores_low() {
        assert_eq!(token_set_ratio("xyz", "pc"), 0);
        assert!(token_set_ratio("xyz", "sanksi") < 50);
    }

    #[test]
    fn test_typo_scores_by_matched_characters() {
        // 2 * 5 common / 11 total
        assert_eq!(token_set_ratio("jadwl", "jadwal"), 91);
        // 2 * 3 / 7
        assert_eq!(token_set_ratio("buk", "buka"), 86);
        // 2 * 4 / 9
        assert_eq!(token_set_ratio("tutp", "tutup"), 89);
        assert_eq!(token_set_ratio("sql", "mysql"), 75);
    }

    #[test]
    fn test_ratio_counts_common_subsequence() {
        assert_eq!(ratio("abc", "abc"), 100);
        assert_eq!(ratio("abc", "xyz"), 0);
        // "acb" vs "abc": longest common subsequence is 2 of 6 characters
        assert_eq!(ratio("acb", "abc"), 67);
        assert_eq!(common_subsequence_len(&['k', 'i', 't'], &['s', 'i', 't']), 2);
    }

    #[test]
    fn test_ties_round_to_even() {
        // 62.5 and 12.5
        assert_eq!(round_half_even(200 * 5, 16), 62);
        assert_eq!(round_half_even(200 * 3, 48), 12);
        // 37.5
        assert_eq!(round_half_even(200 * 3, 16), 38);
        assert_eq!(round_half_even(200, 3), 67);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(token_set_ratio("", "jadwal"), 0);
        assert_eq!(token_set_ratio("?!", "jadwal"), 0);
        assert_eq!(ratio("", ""), 0);
    }

    #[test]
    fn test_punctuation_ignored() {
        assert_eq!(token_set_ratio("Jam BUKA?", "buka"), 100);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("jam buka, lab!"), vec!["jam", "buka", "lab"]);
        assert!(tokenize("  ...  ").is_empty());
    }
}
