//! Core types for labbot

mod classification;
mod output;
mod reason;
mod record;

pub use classification::ClassificationResult;
pub use output::{ChatReply, ReplyStatus};
pub use reason::ReasonCode;
pub use record::{ConversationRecord, Transcript};
