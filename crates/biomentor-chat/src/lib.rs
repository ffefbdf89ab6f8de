//! Conversation core for the biology tutor: per-session turn history,
//! message-list assembly and the topic-gated response generator.

pub mod generator;
pub mod history;
pub mod session;

pub use generator::{
    GenerateError, Outcome, Reply, ResponseGenerator,
    ERROR_PREFIX, MISSING_API_KEY_PROMPT, outcome_kind, outcome_text,
};
pub use history::{build_message_list, build_message_list_from_parallel, DEFAULT_PERSONA};
pub use biomentor_models::ReplyKind;
pub use session::{ChatSession, SessionError, TurnPhase};
