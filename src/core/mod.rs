//! Core modules for labbot

pub mod similarity;
pub mod vocabulary;
pub mod knowledge;
pub mod classifier;
pub mod synthesizer;
pub mod transcript;
pub mod rate_limit;
pub mod orchestrator;
pub mod api;

pub use similarity::{token_set_ratio, tokenize};
pub use vocabulary::{CategoryVocabulary, VocabularyTable};
pub use knowledge::{deep_get, KnowledgeBase};
pub use classifier::{IntentClassifier, GREETING_TOKENS};
pub use synthesizer::ResponseSynthesizer;
pub use transcript::{InMemoryTranscriptStore, TranscriptStore};
pub use rate_limit::RateLimiter;
pub use orchestrator::{ChatEngine, ChatOrchestrator, LabEngine, MSG_INTERNAL_ERROR};
pub use api::{create_router, run_server, MSG_RATE_LIMITED, UNKNOWN_CLIENT};
