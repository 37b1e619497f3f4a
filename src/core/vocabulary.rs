//! Vocabulary table: category name → keywords
//!
//! Categories keep their configuration order. The classifier walks them in
//! that order and the first category to reach the best score wins a tie.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::error::LabbotError;
use crate::{ATURAN, GREETING, JADWAL, SPESIFIKASI};

/// Built-in lab vocabulary
const DEFAULT_VOCABULARY: &[(&str, &[&str])] = &[
    (JADWAL, &["jadwal", "buka", "tutup", "istirahat", "hari kerja"]),
    (ATURAN, &["aturan", "sanksi", "syarat", "peraturan", "dilarang"]),
    (SPESIFIKASI, &["spesifikasi", "pc", "komputer", "software", "hardware", "mysql"]),
];

/// One category with its keywords (lowercase, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered, immutable category vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyTable {
    categories: Vec<CategoryVocabulary>,
}

impl Default for VocabularyTable {
    fn default() -> Self {
        Self::lab_default()
    }
}

impl VocabularyTable {
    /// Build a table, rejecting anything the classifier could never select
    pub fn new<N, K>(entries: impl IntoIterator<Item = (N, Vec<K>)>) -> Result<Self, LabbotError>
    where
        N: Into<String>,
        K: Into<String>,
    {
        let mut categories = Vec::new();
        let mut seen = HashSet::new();

        for (name, keywords) in entries {
            let name: String = name.into().trim().to_lowercase();
            if name.is_empty() {
                return Err(LabbotError::Vocabulary("category name is empty".into()));
            }
            if name == GREETING {
                return Err(LabbotError::Vocabulary(format!(
                    "'{}' is reserved for the greeting fast-path",
                    GREETING
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(LabbotError::Vocabulary(format!("duplicate category '{}'", name)));
            }

            let keywords: Vec<String> = keywords
                .into_iter()
                .map(|k| k.into().trim().to_lowercase())
                .collect();
            if keywords.is_empty() {
                return Err(LabbotError::Vocabulary(format!("category '{}' has no keywords", name)));
            }
            if keywords.iter().any(|k| k.is_empty()) {
                return Err(LabbotError::Vocabulary(format!("category '{}' has a blank keyword", name)));
            }

            categories.push(CategoryVocabulary { name, keywords });
        }

        if categories.is_empty() {
            return Err(LabbotError::Vocabulary("no categories configured".into()));
        }

        Ok(Self { categories })
    }

    /// Parse a JSON array of `{"name": ..., "keywords": [...]}` objects
    pub fn from_json_str(json: &str) -> Result<Self, LabbotError> {
        let entries: Vec<CategoryVocabulary> = serde_json::from_str(json)
            .map_err(|e| LabbotError::Vocabulary(format!("malformed vocabulary: {}", e)))?;
        Self::new(entries.into_iter().map(|c| (c.name, c.keywords)))
    }

    /// The lab vocabulary: jadwal, aturan, spesifikasi
    pub fn lab_default() -> Self {
        Self {
            categories: DEFAULT_VOCABULARY
                .iter()
                .map(|(name, keywords)| CategoryVocabulary {
                    name: name.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Categories in configuration order
    pub fn categories(&self) -> impl Iterator<Item = &CategoryVocabulary> {
        self.categories.iter()
    }

    /// Category names in configuration order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn keywords(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.keywords.as_slice())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
