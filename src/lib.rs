//! labbot: lab information chatbot
//!
//! Free text → IntentClassifier → ResponseSynthesizer → ChatOrchestrator transcript

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::{ChatConfig, ClassifierConfig};
pub use error::{InputError, KnowledgeError, LabbotError};

// =============================================================================
// CLASSIFIER THRESHOLDS
// =============================================================================

/// Minimum token-set score (0-100) for a category to be accepted
pub const DEFAULT_MIN_CONFIDENCE: u8 = 50;

/// Inputs longer than this (in characters) are rejected before classification
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 500;

/// Normalized inputs of at most this many characters count as "short"
pub const SHORT_INPUT_LEN: usize = 4;

/// Short inputs must score strictly above max(this, min confidence)
pub const SHORT_INPUT_FLOOR: u8 = 80;

/// Single-word inputs need a keyword at least this similar (unless equal or substring)
pub const STRONG_MATCH_FLOOR: u8 = 90;

// =============================================================================
// SESSIONS & RATE LIMITING
// =============================================================================

/// Records kept per session transcript (oldest evicted first)
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Requests allowed per client inside the rate limit window
pub const DEFAULT_MAX_REQUESTS_PER_MINUTE: usize = 30;

/// Sliding window for rate limiting (seconds)
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Sessions without activity for this long are forgotten (seconds)
pub const DEFAULT_SESSION_LIFETIME_SECS: u64 = 3600;

/// How often the server drops expired sessions and idle rate-limit entries (seconds)
pub const SWEEP_INTERVAL_SECS: u64 = 60;

// =============================================================================
// CATEGORIES
// =============================================================================

/// Assigned by the greeting fast-path only, never by scoring
pub const GREETING: &str = "greeting";

/// Opening hours topic
pub const JADWAL: &str = "jadwal";

/// Lab rules and penalties topic
pub const ATURAN: &str = "aturan";

/// Hardware and software topic
pub const SPESIFIKASI: &str = "spesifikasi";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
