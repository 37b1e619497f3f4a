//! Conversation records and capped transcripts

use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user/bot exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub user_input: String,
    pub bot_response: String,
    /// Assigned category, None when nothing matched
    pub category: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ConversationRecord {
    /// Create a new record stamped with the current time
    pub fn new(
        user_input: impl Into<String>,
        bot_response: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            user_input: user_input.into(),
            bot_response: bot_response.into(),
            category,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered session history, oldest first, capped by the caller
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    records: VecDeque<ConversationRecord>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, then keep only the newest `cap`
    pub fn push(&mut self, record: ConversationRecord, cap: usize) {
        self.records.push_back(record);
        self.trim(cap);
    }

    /// Evict oldest records until at most `cap` remain
    pub fn trim(&mut self, cap: usize) {
        while self.records.len() > cap {
            self.records.pop_front();
        }
    }

    /// All records, oldest first
    pub fn to_vec(&self) -> Vec<ConversationRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
