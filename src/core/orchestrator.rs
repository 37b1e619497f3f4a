//! Conversation Orchestrator: validate → classify → respond → record
//!
//! The one place where faults are caught. Invalid input is answered with a
//! validation message and never recorded; a panic inside classification or
//! synthesis becomes an apology and is recorded without a category.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};
use crate::config::ChatConfig;
use crate::core::classifier::IntentClassifier;
use crate::core::knowledge::KnowledgeBase;
use crate::core::synthesizer::ResponseSynthesizer;
use crate::core::transcript::{InMemoryTranscriptStore, TranscriptStore};
use crate::core::vocabulary::VocabularyTable;
use crate::error::InputError;
use crate::types::{ChatReply, ClassificationResult, ConversationRecord};

/// Generic apology for internal faults
pub const MSG_INTERNAL_ERROR: &str = "Maaf, terjadi kesalahan. Silakan coba lagi.";

/// The classify/respond pair an orchestrator drives.
///
/// `classify` and `respond` run inside the orchestrator's fault boundary;
/// a panic in either is answered with [`MSG_INTERNAL_ERROR`].
pub trait ChatEngine: Send + Sync {
    /// Reject input that must not reach classification
    fn validate(&self, input: &str) -> Result<(), InputError>;

    fn classify(&self, input: &str) -> ClassificationResult;

    fn respond(&self, category: Option<&str>, input: &str) -> String;

    /// Category names offered to users, in configuration order
    fn categories(&self) -> Vec<String>;

    /// Whether any knowledge is available to answer from
    fn has_knowledge(&self) -> bool;
}

/// Keyword classifier plus KB-driven synthesizer
#[derive(Debug, Clone)]
pub struct LabEngine {
    classifier: IntentClassifier,
    synthesizer: ResponseSynthesizer,
}

impl LabEngine {
    pub fn new(
        config: &ChatConfig,
        knowledge: Arc<KnowledgeBase>,
        vocabulary: Arc<VocabularyTable>,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(Arc::clone(&vocabulary), config.classifier),
            synthesizer: ResponseSynthesizer::new(knowledge, vocabulary),
        }
    }
}

impl ChatEngine for LabEngine {
    fn validate(&self, input: &str) -> Result<(), InputError> {
        self.classifier.validate(input)
    }

    fn classify(&self, input: &str) -> ClassificationResult {
        self.classifier.classify(input)
    }

    fn respond(&self, category: Option<&str>, input: &str) -> String {
        self.synthesizer.respond(category, input)
    }

    fn categories(&self) -> Vec<String> {
        self.classifier
            .vocabulary()
            .category_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn has_knowledge(&self) -> bool {
        !self.synthesizer.knowledge().is_empty()
    }
}

/// Runs one exchange at a time per call; safe to share across tasks
pub struct ChatOrchestrator {
    engine: Box<dyn ChatEngine>,
    store: Arc<dyn TranscriptStore>,
    max_history: usize,
}

impl ChatOrchestrator {
    pub fn new(
        config: &ChatConfig,
        knowledge: Arc<KnowledgeBase>,
        vocabulary: Arc<VocabularyTable>,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self::with_engine(LabEngine::new(config, knowledge, vocabulary), store, config.max_history)
    }

    /// Drive any engine over `store`, keeping `max_history` records per session
    pub fn with_engine(
        engine: impl ChatEngine + 'static,
        store: Arc<dyn TranscriptStore>,
        max_history: usize,
    ) -> Self {
        Self {
            engine: Box::new(engine),
            store,
            max_history,
        }
    }

    /// Default config and vocabulary, in-memory transcripts
    pub fn with_knowledge(knowledge: KnowledgeBase) -> Self {
        Self::new(
            &ChatConfig::default(),
            Arc::new(knowledge),
            Arc::new(VocabularyTable::default()),
            Arc::new(InMemoryTranscriptStore::new()),
        )
    }

    pub fn engine(&self) -> &dyn ChatEngine {
        self.engine.as_ref()
    }

    pub fn store(&self) -> &dyn TranscriptStore {
        self.store.as_ref()
    }

    /// Answer `input` for `session_id` and record the exchange
    pub fn handle(&self, session_id: &str, input: &str) -> ChatReply {
        if let Err(err) = self.engine.validate(input) {
            debug!(session_id, error = %err, "input rejected");
            return ChatReply::invalid(err.user_message());
        }

        let input = input.trim();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let result = self.engine.classify(input);
            let response = self.engine.respond(result.category(), input);
            (result, response)
        }));

        let reply = match outcome {
            Ok((result, response)) => ChatReply::answered(
                response,
                result.category().map(str::to_string),
                result.score(),
            ),
            Err(_) => {
                error!(session_id, "internal fault while answering");
                ChatReply::failed(MSG_INTERNAL_ERROR.to_string())
            }
        };

        self.store.append(
            session_id,
            ConversationRecord::new(input, reply.response.clone(), reply.category.clone()),
            self.max_history,
        );
        reply
    }

    pub fn history(&self, session_id: &str) -> Vec<ConversationRecord> {
        self.store.get(session_id)
    }

    pub fn clear_history(&self, session_id: &str) -> bool {
        self.store.clear(session_id)
    }

    /// Drop sessions idle past the store's lifetime; returns how many
    pub fn evict_expired_sessions(&self) -> usize {
        let evicted = self.store.evict_expired();
        if evicted > 0 {
            debug!(evicted, "expired sessions evicted");
        }
        evicted
    }
}
