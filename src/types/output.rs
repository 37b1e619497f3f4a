//! Orchestrator reply structures for terminal and API display

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// How a request was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyStatus {
    /// Classified and answered (including "didn't understand")
    Answered,
    /// Rejected by input validation, nothing recorded
    Invalid,
    /// Internal fault, apology returned
    Failed,
}

impl std::fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReplyStatus::Answered => "ANSWERED",
            ReplyStatus::Invalid => "INVALID",
            ReplyStatus::Failed => "FAILED",
        };
        write!(f, "{}", name)
    }
}

/// Output of one orchestrator turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub category: Option<String>,
    /// Classifier score, 0 when not classified
    pub score: u8,
    pub status: ReplyStatus,
}

impl ChatReply {
    pub fn answered(response: String, category: Option<String>, score: u8) -> Self {
        Self { response, category, score, status: ReplyStatus::Answered }
    }

    pub fn invalid(response: String) -> Self {
        Self { response, category: None, score: 0, status: ReplyStatus::Invalid }
    }

    pub fn failed(response: String) -> Self {
        Self { response, category: None, score: 0, status: ReplyStatus::Failed }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        match self.status {
            ReplyStatus::Answered => self.response.green().to_string(),
            ReplyStatus::Invalid => self.response.yellow().to_string(),
            ReplyStatus::Failed => self.response.red().to_string(),
        }
    }

    /// Format with category and score (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "status={} | category={} | score={}\n{}",
            self.status,
            self.category.as_deref().unwrap_or("none"),
            self.score,
            self.response
        )
    }
}
