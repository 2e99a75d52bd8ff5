use axum::Router;

use crate::ai::config::{AiConfig, ProviderSettings};
use crate::api::{router, ApiConfig};

/// Provider config pointing both providers at mock chat endpoints.
pub fn test_ai_config(groq_url: &str, openai_url: &str) -> AiConfig {
    AiConfig {
        groq: ProviderSettings {
            api_key: Some("groq-test-key".to_string()),
            model: "llama-3.3-70b-versatile".to_string(),
            chat_url: Some(groq_url.to_string()),
        },
        openai: ProviderSettings {
            api_key: Some("openai-test-key".to_string()),
            model: "gpt-4o-mini".to_string(),
            chat_url: Some(openai_url.to_string()),
        },
        request_timeout_secs: 5,
    }
}

/// Router wired to mock providers, with rate limiting disabled.
pub fn test_router(groq_url: &str, openai_url: &str) -> Router {
    router(
        test_ai_config(groq_url, openai_url),
        ApiConfig {
            rate_limit: None,
            max_input_chars: 2000,
        },
    )
}

/// Router with no provider keys and no rate limiting; every optimization
/// attempt fails before any network call.
pub fn unconfigured_router() -> Router {
    router(
        AiConfig::unconfigured(),
        ApiConfig {
            rate_limit: None,
            max_input_chars: 2000,
        },
    )
}
