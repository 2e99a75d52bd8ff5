use std::env;

use crate::ai::routing::Provider;

/// Connection settings for a single upstream provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub chat_url: Option<String>,
}

#[derive(Clone)]
pub struct AiConfig {
    pub groq: ProviderSettings,
    pub openai: ProviderSettings,
    pub request_timeout_secs: u64,
}

impl AiConfig {
    /// Read provider settings from the environment.
    ///
    /// Returns `None` when neither provider has an API key so the caller can
    /// tell an unconfigured deployment apart from a misbehaving one.
    pub fn from_env() -> Option<Self> {
        let groq_key = env::var("GROQ_API_KEY").ok();
        let openai_key = env::var("OPENAI_API_KEY").ok();
        if groq_key.is_none() && openai_key.is_none() {
            return None;
        }
        Some(Self {
            groq: ProviderSettings {
                api_key: groq_key,
                model: env::var("GROQ_MODEL")
                    .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
                chat_url: env::var("GROQ_CHAT_URL").ok(),
            },
            openai: ProviderSettings {
                api_key: openai_key,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                chat_url: env::var("OPENAI_CHAT_URL").ok(),
            },
            request_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Placeholder configuration for deployments with no API keys. Requests
    /// still flow through the normal fallback path and fail per attempt.
    pub fn unconfigured() -> Self {
        Self {
            groq: ProviderSettings {
                api_key: None,
                model: "llama-3.3-70b-versatile".to_string(),
                chat_url: None,
            },
            openai: ProviderSettings {
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                chat_url: None,
            },
            request_timeout_secs: 30,
        }
    }

    pub fn provider(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Groq => &self.groq,
            Provider::OpenAi => &self.openai,
        }
    }
}
