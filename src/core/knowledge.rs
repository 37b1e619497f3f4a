//! Knowledge base: read-only JSON document of lab facts
//!
//! Each top-level key is a topic (`jadwal`, `aturan`, `spesifikasi`, ...).
//! Loading never fails the caller: anything unreadable, malformed, or not a
//! mapping becomes an empty KB, and every lookup on it returns None.

use std::path::Path;
use serde_json::{Map, Value};
use tracing::{info, warn};
use crate::error::KnowledgeError;

/// Immutable topic → document mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    topics: Map<String, Value>,
}

impl KnowledgeBase {
    /// KB with no topics
    pub fn empty() -> Self {
        Self::default()
    }

    /// Strict conversion, fails when the root is not a mapping
    pub fn try_from_value(value: Value) -> Result<Self, KnowledgeError> {
        match value {
            Value::Object(topics) => Ok(Self { topics }),
            _ => Err(KnowledgeError::NotAMapping),
        }
    }

    /// Lenient conversion, a non-mapping root gives an empty KB
    pub fn from_value(value: Value) -> Self {
        Self::try_from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "knowledge base ignored");
            Self::empty()
        })
    }

    /// Strict parse of a JSON document
    pub fn try_from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from_value(value)
    }

    /// Strict load from disk
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path)?;
        Self::try_from_json_str(&content)
    }

    /// Load from disk, degrading to an empty KB on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(kb) => {
                info!(path = %path.display(), topics = kb.len(), "knowledge base loaded");
                kb
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "knowledge base unavailable, using empty");
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Walk `path` starting at the topic level: `get(&["spesifikasi", "pc", "ram"])`
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (topic, rest) = path.split_first()?;
        deep_get(self.topics.get(*topic)?, rest)
    }
}

/// Follow `keys` through nested mappings.
///
/// Stops with None at the first missing key or non-mapping value. An empty
/// key list returns `value` itself.
pub fn deep_get<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_get_nested() {
        let doc = json!({"pc": {"ram": "16GB", "cpu": {"cores": 8}}});
        assert_eq!(deep_get(&doc, &["pc", "ram"]), Some(&json!("16GB")));
        assert_eq!(deep_get(&doc, &["pc", "cpu", "cores"]), Some(&json!(8)));
        assert_eq!(deep_get(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_deep_get_stops_at_non_mapping() {
        let doc = json!({"pc": {"ram": "16GB"}, "software": ["vscode"]});
        assert_eq!(deep_get(&doc, &["pc", "ram", "size"]), None);
        assert_eq!(deep_get(&doc, &["software", "0"]), None);
        assert_eq!(deep_get(&doc, &["missing", "ram"]), None);
        assert_eq!(deep_get(&json!("scalar"), &["x"]), None);
    }

    #[test]
    fn test_non_mapping_root_is_empty() {
        assert!(KnowledgeBase::from_value(json!([1, 2, 3])).is_empty());
        assert!(KnowledgeBase::from_value(Value::Null).is_empty());
        assert!(matches!(
            KnowledgeBase::try_from_value(json!("text")),
            Err(KnowledgeError::NotAMapping)
        ));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            KnowledgeBase::try_from_json_str("{ not json"),
            Err(KnowledgeError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let kb = KnowledgeBase::load("/nonexistent/knowledge_base.json");
        assert!(kb.is_empty());
        assert!(kb.get(&["jadwal", "jam_buka"]).is_none());
    }

    #[test]
    fn test_get_by_topic_path() {
        let kb = KnowledgeBase::from_value(json!({"jadwal": {"jam_buka": "08:00"}}));
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get(&["jadwal", "jam_buka"]), Some(&json!("08:00")));
        assert_eq!(kb.get(&["jadwal"]), Some(&json!({"jam_buka": "08:00"})));
        assert_eq!(kb.get(&[]), None);
    }
}
