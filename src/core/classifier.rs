//! Intent Classifier: free text → category via fuzzy keyword matching
//!
//! Decision order:
//! 1. Reject empty, whitespace-only, or over-length input
//! 2. Greeting token present → `greeting`, no scoring
//! 3. Score every category by its best keyword (max, not sum)
//! 4. Short input (≤ 4 chars) must score above max(80, min confidence)
//! 5. A single word must strongly match a keyword of the winning category
//! 6. Accept if the score reaches min confidence (50)

use std::sync::Arc;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use crate::config::ClassifierConfig;
use crate::core::similarity::{token_set_ratio, tokenize};
use crate::core::vocabulary::VocabularyTable;
use crate::error::InputError;
use crate::types::{ClassificationResult, ReasonCode};
use crate::GREETING;

/// Greeting and closing phrases, matched as whole words
pub const GREETING_TOKENS: &[&str] = &["halo", "hai", "selamat", "terima kasih", "makasih"];

lazy_static! {
    static ref RE_GREETING: Regex = {
        let alternatives: Vec<String> = GREETING_TOKENS
            .iter()
            .map(|t| regex::escape(t).replace(' ', r"\s+"))
            .collect();
        Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).unwrap()
    };
}

/// Stateless classifier over a shared vocabulary
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    vocabulary: Arc<VocabularyTable>,
    config: ClassifierConfig,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(Arc::new(VocabularyTable::default()), ClassifierConfig::default())
    }
}

impl IntentClassifier {
    pub fn new(vocabulary: Arc<VocabularyTable>, config: ClassifierConfig) -> Self {
        Self { vocabulary, config }
    }

    pub fn vocabulary(&self) -> &VocabularyTable {
        &self.vocabulary
    }

    /// Check emptiness and length (in characters)
    pub fn validate(&self, input: &str) -> Result<(), InputError> {
        if input.trim().is_empty() {
            return Err(InputError::Empty);
        }
        let len = input.chars().count();
        if len > self.config.max_input_length {
            return Err(InputError::TooLong { len, max: self.config.max_input_length });
        }
        Ok(())
    }

    /// Classify raw input
    pub fn classify(&self, input: &str) -> ClassificationResult {
        let result = self.decide(input);
        debug!(
            category = result.category().unwrap_or("none"),
            score = result.score(),
            reason = result.reason().code(),
            "classified input"
        );
        result
    }

    fn decide(&self, input: &str) -> ClassificationResult {
        if self.validate(input).is_err() {
            return ClassificationResult::no_match(0, ReasonCode::C000_INVALID_INPUT);
        }

        let normalized = input.trim().to_lowercase();

        if is_greeting(&normalized) {
            return ClassificationResult::matched(GREETING, 100, ReasonCode::C001_GREETING);
        }

        let Some((category, score)) = self.best_category(&normalized) else {
            return ClassificationResult::no_match(0, ReasonCode::C006_NO_CANDIDATE);
        };

        if normalized.chars().count() <= self.config.short_input_len {
            let floor = self.config.short_input_floor.max(self.config.min_confidence);
            if score <= floor {
                return ClassificationResult::no_match(score, ReasonCode::C004_SHORT_INPUT);
            }
        }

        let tokens = tokenize(&normalized);
        if tokens.len() == 1 && !self.is_strong_match(tokens[0], category) {
            return ClassificationResult::no_match(score, ReasonCode::C005_WEAK_SINGLE_TOKEN);
        }

        if score < self.config.min_confidence {
            return ClassificationResult::no_match(score, ReasonCode::C003_BELOW_THRESHOLD);
        }

        ClassificationResult::matched(category, score, ReasonCode::C002_MATCHED)
    }

    /// Best (category, score) in vocabulary order; ties keep the earlier category.
    /// None when no keyword shares anything with the input.
    pub fn best_category(&self, normalized: &str) -> Option<(&str, u8)> {
        let mut best: Option<(&str, u8)> = None;

        for entry in self.vocabulary.categories() {
            let score = entry
                .keywords
                .iter()
                .map(|keyword| token_set_ratio(normalized, keyword))
                .max()
                .unwrap_or(0);

            if score > best.map_or(0, |(_, s)| s) {
                best = Some((entry.name.as_str(), score));
            }
        }

        best
    }

    /// Exact, substring either way, or similarity ≥ strong-match floor
    fn is_strong_match(&self, token: &str, category: &str) -> bool {
        let Some(keywords) = self.vocabulary.keywords(category) else {
            return false;
        };
        keywords.iter().any(|keyword| {
            token == keyword
                || keyword.contains(token)
                || token.contains(keyword.as_str())
                || token_set_ratio(token, keyword) >= self.config.strong_match_floor
        })
    }
}

/// Whole-word greeting check on normalized input
pub fn is_greeting(normalized: &str) -> bool {
    RE_GREETING.is_match(normalized)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    #[test]
    fn test_schedule_question() {
        let result = classifier().classify("jam buka lab");
        assert_eq!(result.category(), Some("jadwal"));
        assert_eq!(result.score(), 100);
    }

    #[test]
    fn test_rules_question() {
        assert_eq!(classifier().classify("apa sanksi kalau telat").category(), Some("aturan"));
        assert_eq!(classifier().classify("Apa saja syarat masuk lab?").category(), Some("aturan"));
    }

    #[test]
    fn test_specs_question() {
        assert_eq!(classifier().classify("spesifikasi komputer di lab").category(), Some("spesifikasi"));
        assert_eq!(classifier().classify("ada mysql tidak").category(), Some("spesifikasi"));
    }

    #[test]
    fn test_greeting_takes_priority() {
        let result = classifier().classify("Halo, jam buka lab kapan?");
        assert_eq!(result.category(), Some(GREETING));
        assert_eq!(result.reason(), ReasonCode::C001_GREETING);

        assert_eq!(classifier().classify("terima kasih").category(), Some(GREETING));
        assert_eq!(classifier().classify("makasih ya").category(), Some(GREETING));
    }

    #[test]
    fn test_greeting_whole_word_only() {
        // "haikal" contains "hai" but is not a greeting
        assert!(!is_greeting("haikal"));
        assert!(is_greeting("hai"));
        assert!(is_greeting("selamat pagi"));
        assert!(is_greeting("terima   kasih banyak"));
    }

    #[test]
    fn test_no_overlap_is_none() {
        let result = classifier().classify("xyz");
        assert_eq!(result.category(), None);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let c = classifier();
        assert_eq!(c.classify("").reason(), ReasonCode::C000_INVALID_INPUT);
        assert_eq!(c.classify("   \t ").reason(), ReasonCode::C000_INVALID_INPUT);

        let long = "jadwal ".repeat(100);
        assert!(long.chars().count() > 500);
        assert_eq!(c.classify(&long).reason(), ReasonCode::C000_INVALID_INPUT);
        assert_eq!(c.validate(&long), Err(InputError::TooLong { len: 700, max: 500 }));
    }

    #[test]
    fn test_exact_length_limit_accepted() {
        let c = IntentClassifier::new(
            Arc::new(VocabularyTable::default()),
            ClassifierConfig { max_input_length: 6, ..ClassifierConfig::default() },
        );
        assert!(c.validate("jadwal").is_ok());
        assert!(c.validate("jadwal!").is_err());
    }

    #[test]
    fn test_short_input_exact_keyword_passes() {
        // "pc" is short but matches a keyword exactly
        let result = classifier().classify("pc");
        assert_eq!(result.category(), Some("spesifikasi"));
    }

    #[test]
    fn test_short_input_needs_floor() {
        // "sql" is 3 chars: similarity to "mysql" is 75, below the 80 floor
        let result = classifier().classify("sql");
        assert_eq!(result.category(), None);
        assert_eq!(result.reason(), ReasonCode::C004_SHORT_INPUT);
        assert_eq!(result.score(), 75);
    }

    #[test]
    fn test_short_typo_above_floor_passes() {
        // "buk" scores 86 against "buka" and is a substring of it
        let result = classifier().classify("buk");
        assert_eq!(result.category(), Some("jadwal"));
        assert_eq!(result.score(), 86);
    }

    #[test]
    fn test_single_token_substring_is_strong() {
        // "bukaan" contains keyword "buka"
        assert_eq!(classifier().classify("bukaan").category(), Some("jadwal"));
    }

    #[test]
    fn test_single_token_weak_match_rejected() {
        // "tutp" scores 89 against "tutup": above the short-input floor,
        // not a substring, and short of a strong single-word match
        let result = classifier().classify("tutp");
        assert_eq!(result.category(), None);
        assert_eq!(result.reason(), ReasonCode::C005_WEAK_SINGLE_TOKEN);
        assert_eq!(result.score(), 89);
    }

    #[test]
    fn test_single_token_close_typo_is_strong() {
        // "jadwl" scores 91 against "jadwal"
        let result = classifier().classify("jadwl");
        assert_eq!(result.category(), Some("jadwal"));
        assert_eq!(result.reason(), ReasonCode::C002_MATCHED);
        assert_eq!(result.score(), 91);
    }

    #[test]
    fn test_below_threshold() {
        let result = classifier().classify("bagaimana cuaca di kota bandung minggu ini");
        assert_eq!(result.category(), None);
        assert_eq!(result.reason(), ReasonCode::C003_BELOW_THRESHOLD);
    }

    #[test]
    fn test_shared_word_scores_partially() {
        // "hari" is shared with "hari kerja": 2 * 4 / 14
        let result = classifier().classify("bagaimana cuaca hari ini");
        assert_eq!(result.category(), Some("jadwal"));
        assert_eq!(result.score(), 57);
    }

    #[test]
    fn test_max_not_sum() {
        // One precise keyword beats a category with many loosely related ones
        let vocabulary = VocabularyTable::new(vec![
            ("wide", vec!["lab satu", "lab dua", "lab tiga", "lab empat"]),
            ("narrow", vec!["printer"]),
        ])
        .unwrap();
        let c = IntentClassifier::new(Arc::new(vocabulary), ClassifierConfig::default());
        assert_eq!(c.classify("printer lab rusak").category(), Some("narrow"));
    }

    #[test]
    fn test_tie_goes_to_first_category() {
        let vocabulary = VocabularyTable::new(vec![
            ("first", vec!["printer"]),
            ("second", vec!["printer"]),
        ])
        .unwrap();
        let c = IntentClassifier::new(Arc::new(vocabulary), ClassifierConfig::default());
        assert_eq!(c.classify("printer rusak").category(), Some("first"));
    }

    #[test]
    fn test_deterministic() {
        let c = classifier();
        let inputs = ["jam buka lab", "xyz", "pc", "jadwl", "aturan lab"];
        for input in inputs {
            assert_eq!(c.classify(input), c.classify(input), "{}", input);
        }
    }

    #[test]
    fn test_custom_min_confidence() {
        let strict = IntentClassifier::new(
            Arc::new(VocabularyTable::default()),
            ClassifierConfig { min_confidence: 100, ..ClassifierConfig::default() },
        );
        assert_eq!(strict.classify("jam buka lab").category(), Some("jadwal"));
        assert_eq!(strict.classify("jadwal labb").category(), Some("jadwal"));
        assert_eq!(strict.classify("jadwl lab").category(), None);
    }
}
