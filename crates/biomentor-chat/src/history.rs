use biomentor_models::{Message, Turn};

/// Persona sent as the system message on every request
pub const DEFAULT_PERSONA: &str = "Your name is Biology Mentor, an AI Technical Expert. \
You are here to guide and assist students with biology-related questions. \
Please provide accurate and helpful information in a polite and professional tone. \
Your responses should be brief, around 100 words or fewer. \
If a query falls outside biology, kindly inform the user that the topic is out of scope.";

/// Assemble the request transcript: the persona, then each turn's human
/// message followed by its AI reply when one exists.
///
/// The endpoint is stateless, so the persona is prepended on every call.
/// Output length is `1 + turns + answered turns`.
pub fn build_message_list(persona: &str, turns: &[Turn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(1 + turns.len() * 2);
    messages.push(Message::system(persona));

    for turn in turns {
        messages.push(Message::human(turn.user_text.as_str()));
        if let Some(reply) = &turn.reply {
            messages.push(Message::ai(reply.as_str()));
        }
    }

    messages
}

/// Same as [`build_message_list`] for callers holding past inputs and
/// generated replies as parallel sequences. Pairs by index; an unmatched
/// trailing entry from either side is still emitted.
pub fn build_message_list_from_parallel(persona: &str, past: &[String], generated: &[String]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(1 + past.len() + generated.len());
    messages.push(Message::system(persona));

    for index in 0..past.len().max(generated.len()) {
        if let Some(human) = past.get(index) {
            messages.push(Message::human(human.as_str()));
        }
        if let Some(ai) = generated.get(index) {
            messages.push(Message::ai(ai.as_str()));
        }
    }

    messages
}
