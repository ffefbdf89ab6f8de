#[cfg(test)]
mod wire_format_tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{GenerateContentResponse, Message, ProviderErrorWrapper, Role, Turn, ChatResponse};

    #[test]
    fn test_message_serializes_with_role_tag() {
        let value = serde_json::to_value(Message::human("What is a cell?")).unwrap();
        assert_eq!(value, json!({ "role": "human", "content": "What is a cell?" }));

        let value = serde_json::to_value(Message::ai("The basic unit of life.")).unwrap();
        assert_eq!(value, json!({ "role": "ai", "content": "The basic unit of life." }));
    }

    #[test]
    fn test_message_deserializes_from_role_tag() {
        let message: Message =
            serde_json::from_value(json!({ "role": "system", "content": "persona" })).unwrap();
        assert_eq!(message, Message::system("persona"));
        assert_eq!(message.role(), Role::System);
        assert_eq!(message.content(), "persona");
    }

    #[test]
    fn test_turn_pending_state() {
        let pending = Turn::new("What is DNA?");
        assert!(pending.is_pending());

        let answered = Turn::answered("What is DNA?", "A nucleic acid.");
        assert!(!answered.is_pending());
        assert_eq!(answered.reply.as_deref(), Some("A nucleic acid."));
    }

    #[test]
    fn test_gemini_response_first_text_skips_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "finishReason": "SAFETY" },
                {
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "Mitochondria make ATP." }]
                    },
                    "finishReason": "STOP"
                }
            ]
        }))
        .unwrap();

        assert_eq!(response.first_text(), Some("Mitochondria make ATP."));
    }

    #[test]
    fn test_gemini_response_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_chat_response_null_content_becomes_empty() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert_eq!(response.choices[0].message.content, "");
    }

    #[test]
    fn test_provider_error_describe() {
        let wrapper: ProviderErrorWrapper = serde_json::from_value(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        }))
        .unwrap();
        assert_eq!(
            wrapper.describe().as_deref(),
            Some("INVALID_ARGUMENT: API key not valid.")
        );

        let wrapper: ProviderErrorWrapper = serde_json::from_value(json!({
            "error": { "message": "Incorrect API key provided" }
        }))
        .unwrap();
        assert_eq!(wrapper.describe().as_deref(), Some("Incorrect API key provided"));
    }
}
