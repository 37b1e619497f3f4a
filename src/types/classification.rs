//! Classifier output

use serde::{Deserialize, Serialize};
use crate::types::ReasonCode;

/// Result of classifying one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// A configured category (or greeting) won
    Matched {
        category: String,
        /// Best token-set score, 0-100
        score: u8,
        reason: ReasonCode,
    },
    /// Nothing confident enough; callers treat every variant of this as "none"
    NoMatch {
        /// Best score seen before a guard rejected it (0 when nothing scored)
        best_score: u8,
        reason: ReasonCode,
    },
}

impl ClassificationResult {
    pub fn matched(category: impl Into<String>, score: u8, reason: ReasonCode) -> Self {
        Self::Matched { category: category.into(), score, reason }
    }

    pub fn no_match(best_score: u8, reason: ReasonCode) -> Self {
        Self::NoMatch { best_score, reason }
    }

    /// The matched category, or None
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Matched { category, .. } => Some(category),
            Self::NoMatch { .. } => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub fn score(&self) -> u8 {
        match self {
            Self::Matched { score, .. } => *score,
            Self::NoMatch { best_score, .. } => *best_score,
        }
    }

    pub fn reason(&self) -> ReasonCode {
        match self {
            Self::Matched { reason, .. } | Self::NoMatch { reason, .. } => *reason,
        }
    }
}
