//! Runtime configuration
//!
//! Defaults come from the crate-level constants; the CLI overrides them from
//! flags or environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::{
    DEFAULT_MAX_HISTORY, DEFAULT_MAX_INPUT_LENGTH, DEFAULT_MAX_REQUESTS_PER_MINUTE,
    DEFAULT_MIN_CONFIDENCE, DEFAULT_SESSION_LIFETIME_SECS, SHORT_INPUT_FLOOR, SHORT_INPUT_LEN,
    STRONG_MATCH_FLOOR,
};
use crate::error::LabbotError;

/// Thresholds used by the intent classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum best score (0-100) to accept a category
    pub min_confidence: u8,
    /// Longer inputs are rejected outright
    pub max_input_length: usize,
    /// Normalized length at or below which the short-input guard applies
    pub short_input_len: usize,
    /// Short inputs must score strictly above max(this, min_confidence)
    pub short_input_floor: u8,
    /// Similarity that makes a single word a strong keyword match
    pub strong_match_floor: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            short_input_len: SHORT_INPUT_LEN,
            short_input_floor: SHORT_INPUT_FLOOR,
            strong_match_floor: STRONG_MATCH_FLOOR,
        }
    }
}

/// Whole-application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub classifier: ClassifierConfig,
    /// Records kept per session transcript
    pub max_history: usize,
    /// Idle time after which a session transcript is dropped
    pub session_lifetime_secs: u64,
    pub rate_limit_enabled: bool,
    pub max_requests_per_minute: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            max_history: DEFAULT_MAX_HISTORY,
            session_lifetime_secs: DEFAULT_SESSION_LIFETIME_SECS,
            rate_limit_enabled: true,
            max_requests_per_minute: DEFAULT_MAX_REQUESTS_PER_MINUTE,
        }
    }
}

impl ChatConfig {
    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_lifetime_secs)
    }

    /// Reject values that would make the bot unusable
    pub fn validate(&self) -> Result<(), LabbotError> {
        let c = &self.classifier;
        if c.max_input_length == 0 {
            return Err(LabbotError::Config("max_input_length must be positive".into()));
        }
        if c.min_confidence > 100 || c.short_input_floor > 100 || c.strong_match_floor > 100 {
            return Err(LabbotError::Config("confidence values must be within 0-100".into()));
        }
        if self.max_history == 0 {
            return Err(LabbotError::Config("max_history must be positive".into()));
        }
        if self.session_lifetime_secs == 0 {
            return Err(LabbotError::Config("session lifetime must be positive".into()));
        }
        if self.rate_limit_enabled && self.max_requests_per_minute == 0 {
            return Err(LabbotError::Config(
                "max_requests_per_minute must be positive when rate limiting is enabled".into(),
            ));
        }
        Ok(())
    }
}
