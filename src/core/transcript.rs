//! Session transcript storage
//!
//! The orchestrator only talks to [`TranscriptStore`], so a persistent backend
//! can replace the in-memory one without touching classification code.

use std::time::{Duration, Instant};
use dashmap::DashMap;
use crate::types::{ConversationRecord, Transcript};
use crate::DEFAULT_SESSION_LIFETIME_SECS;

/// Per-session transcript storage.
///
/// `append` must add and trim as one step with respect to other calls for the
/// same session. Sessions idle longer than the store's lifetime behave as if
/// they never existed.
pub trait TranscriptStore: Send + Sync {
    /// Records for a session, oldest first (empty if unknown)
    fn get(&self, session_id: &str) -> Vec<ConversationRecord>;

    /// Append, then keep only the newest `cap` records
    fn append(&self, session_id: &str, record: ConversationRecord, cap: usize);

    /// Keep only the newest `cap` records
    fn trim(&self, session_id: &str, cap: usize);

    /// Drop a session; true if it existed
    fn clear(&self, session_id: &str) -> bool;

    /// Number of live sessions
    fn session_count(&self) -> usize;

    /// Remove idle sessions; returns how many were dropped
    fn evict_expired(&self) -> usize;
}

#[derive(Debug)]
struct Session {
    transcript: Transcript,
    touched: Instant,
}

impl Session {
    fn new() -> Self {
        Self { transcript: Transcript::new(), touched: Instant::now() }
    }

    fn is_expired(&self, lifetime: Duration) -> bool {
        self.touched.elapsed() >= lifetime
    }
}

/// Process-lifetime store. Each session lives behind its DashMap shard lock.
#[derive(Debug)]
pub struct InMemoryTranscriptStore {
    sessions: DashMap<String, Session>,
    lifetime: Duration,
}

impl Default for InMemoryTranscriptStore {
    fn default() -> Self {
        Self::with_lifetime(Duration::from_secs(DEFAULT_SESSION_LIFETIME_SECS))
    }
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions expire after `lifetime` without an append
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self { sessions: DashMap::new(), lifetime }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn get(&self, session_id: &str) -> Vec<ConversationRecord> {
        self.sessions
            .get(session_id)
            .filter(|s| !s.is_expired(self.lifetime))
            .map(|s| s.transcript.to_vec())
            .unwrap_or_default()
    }

    fn append(&self, session_id: &str, record: ConversationRecord, cap: usize) {
        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);
        if session.is_expired(self.lifetime) {
            session.transcript = Transcript::new();
        }
        session.touched = Instant::now();
        session.transcript.push(record, cap);
    }

    fn trim(&self, session_id: &str, cap: usize) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.transcript.trim(cap);
        }
    }

    fn clear(&self, session_id: &str) -> bool {
        self.sessions
            .remove(session_id)
            .map_or(false, |(_, s)| !s.is_expired(self.lifetime))
    }

    fn session_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| !s.is_expired(self.lifetime))
            .count()
    }

    fn evict_expired(&self) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|_, s| {
            let keep = !s.is_expired(self.lifetime);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn record(text: &str) -> ConversationRecord {
        ConversationRecord::new(text, "ok", None)
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemoryTranscriptStore::new();
        store.append("a", record("one"), 10);
        store.append("b", record("two"), 10);

        assert_eq!(store.get("a").len(), 1);
        assert_eq!(store.get("b")[0].user_input, "two");
        assert!(store.get("c").is_empty());
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_append_trims_fifo() {
        let store = InMemoryTranscriptStore::new();
        for i in 0..5 {
            store.append("s", record(&i.to_string()), 2);
        }
        let inputs: Vec<_> = store.get("s").into_iter().map(|r| r.user_input).collect();
        assert_eq!(inputs, vec!["3", "4"]);
    }

    #[test]
    fn test_trim_and_clear() {
        let store = InMemoryTranscriptStore::new();
        for i in 0..3 {
            store.append("s", record(&i.to_string()), 10);
        }
        store.trim("s", 1);
        assert_eq!(store.get("s")[0].user_input, "2");

        store.trim("missing", 1);
        assert_eq!(store.session_count(), 1);

        assert!(store.clear("s"));
        assert!(!store.clear("s"));
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_idle_session_expires() {
        let store = InMemoryTranscriptStore::with_lifetime(Duration::from_millis(50));
        store.append("old", record("one"), 10);
        thread::sleep(Duration::from_millis(80));
        store.append("fresh", record("two"), 10);

        assert!(store.get("old").is_empty());
        assert_eq!(store.get("fresh").len(), 1);
        assert_eq!(store.session_count(), 1);

        assert_eq!(store.evict_expired(), 1);
        assert_eq!(store.evict_expired(), 0);
        assert!(!store.clear("old"));
        assert!(store.clear("fresh"));
    }

    #[test]
    fn test_append_after_expiry_starts_over() {
        let store = InMemoryTranscriptStore::with_lifetime(Duration::from_millis(50));
        store.append("s", record("before"), 10);
        thread::sleep(Duration::from_millis(80));
        store.append("s", record("after"), 10);

        let inputs: Vec<_> = store.get("s").into_iter().map(|r| r.user_input).collect();
        assert_eq!(inputs, vec!["after"]);
    }

    #[test]
    fn test_activity_keeps_session_alive() {
        let store = InMemoryTranscriptStore::with_lifetime(Duration::from_millis(200));
        for i in 0..4 {
            store.append("s", record(&i.to_string()), 10);
            thread::sleep(Duration::from_millis(60));
        }
        assert_eq!(store.evict_expired(), 0);
        assert_eq!(store.get("s").len(), 4);
    }

    #[test]
    fn test_default_lifetime_is_one_hour() {
        assert_eq!(InMemoryTranscriptStore::new().lifetime(), Duration::from_secs(3600));
    }

    #[test]
    fn test_concurrent_appends_respect_cap() {
        let store = Arc::new(InMemoryTranscriptStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        store.append("shared", record(&format!("{}-{}", t, i)), 25);
                        assert!(store.get("shared").len() <= 25);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("shared").len(), 25);
    }
}
