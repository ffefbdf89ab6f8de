// Models module - conversation data and provider wire formats
pub mod types;
pub mod requests;
pub mod responses;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use types::{Message, ReplyKind, Role, Turn, TranscriptEntry};
pub use requests::{
    ChatRequest, ChatRequestMessage,
    GenerateContentRequest, Content, Part, GenerationConfig,
};
pub use responses::{
    ChatResponse, Choice, ChoiceMessage, Usage,
    GenerateContentResponse, Candidate, CandidateContent, CandidatePart,
    ProviderErrorWrapper, ProviderErrorBody,
};
