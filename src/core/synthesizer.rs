//! Response Synthesizer: category + input → answer text from the knowledge base
//!
//! Every lookup is defensive. A missing field renders as a placeholder, a
//! field of the wrong shape counts as missing, and each knowledge gap has its
//! own fallback message.

use std::sync::Arc;
use serde_json::Value;
use tracing::error;
use crate::core::knowledge::KnowledgeBase;
use crate::core::vocabulary::VocabularyTable;
use crate::{ATURAN, GREETING, JADWAL, SPESIFIKASI};

/// Substituted for any missing scalar field
pub const PLACEHOLDER: &str = "tidak tersedia";

pub const MSG_NO_INFORMATION: &str = "Maaf, informasi belum tersedia saat ini.";
pub const MSG_NO_SANKSI: &str = "Data sanksi belum tersedia.";
pub const MSG_NO_SYARAT: &str = "Data aturan belum tersedia.";
pub const MSG_INCOMPLETE_SPECS: &str = "Data spesifikasi belum lengkap.";
pub const MSG_GREETING: &str =
    "Halo! Saya asisten lab. Silakan tanya tentang jam buka lab, aturan lab, atau spesifikasi PC.";

/// Renders answers from an immutable KB
#[derive(Debug, Clone)]
pub struct ResponseSynthesizer {
    knowledge: Arc<KnowledgeBase>,
    vocabulary: Arc<VocabularyTable>,
}

impl ResponseSynthesizer {
    pub fn new(knowledge: Arc<KnowledgeBase>, vocabulary: Arc<VocabularyTable>) -> Self {
        Self { knowledge, vocabulary }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Answer for `category` (None = not understood)
    pub fn respond(&self, category: Option<&str>, input: &str) -> String {
        let Some(category) = category else {
            return self.not_understood();
        };

        if category == GREETING {
            return MSG_GREETING.to_string();
        }

        if self.knowledge.is_empty() {
            return MSG_NO_INFORMATION.to_string();
        }

        match category {
            JADWAL => self.schedule(),
            ATURAN => self.rules(input),
            SPESIFIKASI => self.specs(),
            other => {
                error!(category = other, "no renderer for category");
                MSG_NO_INFORMATION.to_string()
            }
        }
    }

    /// Help text listing the categories currently configured
    pub fn not_understood(&self) -> String {
        format!(
            "Maaf, saya tidak paham. Coba tanya tentang: {}.",
            self.vocabulary.category_names().join(", ")
        )
    }

    fn schedule(&self) -> String {
        let field = |key: &str| self.scalar(&[JADWAL, key]);
        format!(
            "Lab buka {} pukul {} - {} (istirahat {}).",
            field("hari_kerja"),
            field("jam_buka"),
            field("jam_tutup"),
            field("istirahat")
        )
    }

    fn rules(&self, input: &str) -> String {
        let (key, heading, fallback) = if input.to_lowercase().contains("sanksi") {
            ("sanksi", "Sanksi:", MSG_NO_SANKSI)
        } else {
            ("syarat", "Aturan lab:", MSG_NO_SYARAT)
        };

        let items = list_items(self.knowledge.get(&[ATURAN, key]));
        if items.is_empty() {
            return fallback.to_string();
        }

        let bullets: Vec<String> = items.iter().map(|item| format!("• {}", item)).collect();
        format!("{}\n{}", heading, bullets.join("\n"))
    }

    fn specs(&self) -> String {
        let pc = self
            .knowledge
            .get(&[SPESIFIKASI, "pc"])
            .and_then(Value::as_object)
            .filter(|pc| !pc.is_empty());
        let software = list_items(self.knowledge.get(&[SPESIFIKASI, "software"]));

        let Some(pc) = pc else {
            return MSG_INCOMPLETE_SPECS.to_string();
        };
        if software.is_empty() {
            return MSG_INCOMPLETE_SPECS.to_string();
        }

        let field = |key: &str| pc.get(key).and_then(render_scalar).unwrap_or_else(|| PLACEHOLDER.to_string());
        format!(
            "Spesifikasi: {} PC, {}, RAM {}, {}. Software: {}",
            field("jumlah"),
            field("processor"),
            field("ram"),
            field("os"),
            software.join(", ")
        )
    }

    fn scalar(&self, path: &[&str]) -> String {
        self.knowledge
            .get(path)
            .and_then(render_scalar)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// Strings verbatim, numbers as written, booleans ya/tidak. Blank or
/// structured values count as missing.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("ya".to_string()),
        Value::Bool(false) => Some("tidak".to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Renderable entries of a list field; non-lists give nothing
fn list_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| is_truthy(item))
                .filter_map(render_scalar)
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================
