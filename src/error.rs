//! Error types for labbot
//!
//! Only startup can fail hard. Per-request problems are values: invalid input is an
//! [`InputError`], everything else degrades to a fallback message.

use thiserror::Error;

/// Startup failures (configuration, vocabulary, server bind)
#[derive(Error, Debug)]
pub enum LabbotError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid vocabulary: {0}")]
    Vocabulary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Knowledge base load failures. The loader logs these and falls back to an empty KB.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge base: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse knowledge base: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Knowledge base root is not a mapping")]
    NotAMapping,
}

/// Request validation failures, rejected before classification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("input is empty")]
    Empty,

    #[error("input is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },
}

impl InputError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Empty => "Tulis pertanyaan dulu!".to_string(),
            Self::TooLong { max, .. } => {
                format!("Pertanyaan terlalu panjang (maksimal {} karakter).", max)
            }
        }
    }
}
