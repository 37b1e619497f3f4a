//! Reason codes for classification decisions

use serde::{Deserialize, Serialize};

/// Why the classifier produced its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    /// Empty, whitespace-only, or over-length input
    C000_INVALID_INPUT,
    /// Greeting token found, scoring skipped
    C001_GREETING,
    /// Best category cleared every guard
    C002_MATCHED,
    /// Best score below minimum confidence
    C003_BELOW_THRESHOLD,
    /// Short input did not clear the short-input floor
    C004_SHORT_INPUT,
    /// Single word was not a strong match for any keyword of the best category
    C005_WEAK_SINGLE_TOKEN,
    /// No category produced a score
    C006_NO_CANDIDATE,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::C000_INVALID_INPUT => "C000_INVALID_INPUT",
            Self::C001_GREETING => "C001_GREETING",
            Self::C002_MATCHED => "C002_MATCHED",
            Self::C003_BELOW_THRESHOLD => "C003_BELOW_THRESHOLD",
            Self::C004_SHORT_INPUT => "C004_SHORT_INPUT",
            Self::C005_WEAK_SINGLE_TOKEN => "C005_WEAK_SINGLE_TOKEN",
            Self::C006_NO_CANDIDATE => "C006_NO_CANDIDATE",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::C000_INVALID_INPUT => "Input rejected before classification",
            Self::C001_GREETING => "Greeting detected",
            Self::C002_MATCHED => "Category matched",
            Self::C003_BELOW_THRESHOLD => "Score below minimum confidence",
            Self::C004_SHORT_INPUT => "Short input below short-input floor",
            Self::C005_WEAK_SINGLE_TOKEN => "Single word without strong keyword match",
            Self::C006_NO_CANDIDATE => "No category scored",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
