#[cfg(test)]
mod model_config_tests {
    use std::time::Duration;

    use crate::config::{
        get_default_url_for_backend, normalize_api_url, parse_model_spec, BackendType, ClientProvider,
        ClientSettings, GEMINI_API_URL, OPENAI_API_URL,
    };
    use crate::{LlmClient, LlmError};

    #[test]
    fn test_parse_model_full_format() {
        let (model, backend, url) = parse_model_spec("llama-3.1-8b@llama(http://localhost:8080)");

        assert_eq!(model, "llama-3.1-8b");
        assert_eq!(backend, Some(BackendType::OpenAI));
        assert_eq!(url, Some("http://localhost:8080".to_string()));
    }

    #[test]
    fn test_parse_model_backend_only() {
        let (model, backend, url) = parse_model_spec("gemini-1.5-flash@gemini");

        assert_eq!(model, "gemini-1.5-flash");
        assert_eq!(backend, Some(BackendType::Gemini));
        assert_eq!(url, None);
    }

    #[test]
    fn test_parse_model_only() {
        let (model, backend, url) = parse_model_spec("gemini-pro");

        assert_eq!(model, "gemini-pro");
        assert_eq!(backend, None);
        assert_eq!(url, None);
    }

    #[test]
    fn test_parse_model_unknown_backend() {
        let (model, backend, url) = parse_model_spec("model@mystery");

        assert_eq!(model, "model");
        assert_eq!(backend, None);
        assert_eq!(url, None);
    }

    #[test]
    fn test_parse_model_malformed_parentheses() {
        let (model, backend, url) = parse_model_spec("gpt-4o@openai(https://example.com");

        assert_eq!(model, "gpt-4o");
        assert_eq!(backend, Some(BackendType::OpenAI));
        assert_eq!(url, Some("https://example.com".to_string()));
    }

    #[test]
    fn test_backend_from_str_aliases() {
        assert_eq!(BackendType::from_str("Gemini"), Some(BackendType::Gemini));
        assert_eq!(BackendType::from_str("google"), Some(BackendType::Gemini));
        assert_eq!(BackendType::from_str("groq"), Some(BackendType::OpenAI));
        assert_eq!(BackendType::from_str("llama.cpp"), Some(BackendType::OpenAI));
        assert_eq!(BackendType::from_str("anthropic"), None);
    }

    #[test]
    fn test_backend_detect_from_url() {
        assert_eq!(BackendType::detect_from_url(GEMINI_API_URL), BackendType::Gemini);
        assert_eq!(BackendType::detect_from_url("http://localhost:8080"), BackendType::OpenAI);
    }

    #[test]
    fn test_default_urls() {
        assert_eq!(get_default_url_for_backend(BackendType::Gemini), GEMINI_API_URL);
        assert_eq!(get_default_url_for_backend(BackendType::OpenAI), OPENAI_API_URL);
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(
            normalize_api_url("http://localhost:8080"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            normalize_api_url("http://localhost:8080/"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            normalize_api_url("https://api.groq.com/openai/v1"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(normalize_api_url(OPENAI_API_URL), OPENAI_API_URL);
    }

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();

        assert_eq!(settings.backend, BackendType::Gemini);
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.temperature, 0.5);
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(settings.api_url(), GEMINI_API_URL);
    }

    #[test]
    fn test_settings_build_client_for_each_backend() {
        let gemini = ClientSettings::default();
        let client = gemini.client_for("key").unwrap();
        assert_eq!(client.model(), "gemini-pro");

        let openai = ClientSettings {
            backend: BackendType::OpenAI,
            model: "gpt-4o-mini".to_string(),
            ..ClientSettings::default()
        };
        let client = openai.client_for("key").unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(openai.api_url(), OPENAI_API_URL);
    }

    #[test]
    fn test_error_display_is_bare_message() {
        assert_eq!(LlmError::Provider("timeout".to_string()).to_string(), "timeout");
        assert_eq!(
            LlmError::Api { status: 429, message: "Resource exhausted".to_string() }.to_string(),
            "Resource exhausted (HTTP 429)"
        );
    }

    #[test]
    fn test_error_is_auth() {
        let bad_key = LlmError::Api {
            status: 400,
            message: "INVALID_ARGUMENT: API key not valid. Please pass a valid API key.".to_string(),
        };
        assert!(bad_key.is_auth());
        assert!(LlmError::Api { status: 401, message: String::new() }.is_auth());
        assert!(!LlmError::Api { status: 500, message: "boom".to_string() }.is_auth());
        assert!(!LlmError::EmptyResponse.is_auth());
    }
}
