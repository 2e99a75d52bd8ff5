use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

use crate::ai::config::ProviderSettings;
use crate::ai::routing::Provider;

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Sampling parameters sent with each completion request.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl SamplingParams {
    /// Tuned per provider: Groq keeps outputs short and fast, OpenAI gets a
    /// larger budget for the heavier prompts routed to it.
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Groq => Self {
                max_tokens: 600,
                temperature: 0.7,
                top_p: 0.9,
                frequency_penalty: 0.1,
                presence_penalty: 0.1,
            },
            Provider::OpenAi => Self {
                max_tokens: 800,
                temperature: 0.6,
                top_p: 0.95,
                frequency_penalty: 0.2,
                presence_penalty: 0.1,
            },
        }
    }
}

fn default_chat_url(provider: Provider) -> &'static str {
    match provider {
        Provider::Groq => GROQ_CHAT_URL,
        Provider::OpenAi => OPENAI_CHAT_URL,
    }
}

fn build_chat_body(
    model: &str,
    params: SamplingParams,
    system_prompt: &str,
    user_prompt: &str,
) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": user_prompt },
        ],
        "max_tokens": params.max_tokens,
        "temperature": params.temperature,
        "top_p": params.top_p,
        "frequency_penalty": params.frequency_penalty,
        "presence_penalty": params.presence_penalty,
    })
}

/// Ask `provider` for a chat completion and return the trimmed message text.
#[instrument(level = "trace", skip(client, settings, system_prompt, user_prompt))]
pub async fn complete_chat(
    client: &reqwest::Client,
    provider: Provider,
    settings: &ProviderSettings,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String> {
    let api_key = settings
        .api_key
        .as_deref()
        .ok_or_else(|| anyhow!("no API key configured for {provider}"))?;
    let url = settings
        .chat_url
        .as_deref()
        .unwrap_or_else(|| default_chat_url(provider));
    let params = SamplingParams::for_provider(provider);
    let body = build_chat_body(&settings.model, params, system_prompt, user_prompt);

    debug!(url, model = %settings.model, "sending chat completion request");

    let resp = client
        .post(url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let err_text = resp.text().await.unwrap_or_default();
        warn!(%status, %provider, "provider API error");
        return Err(anyhow!("{provider} API error {status}: {err_text}"));
    }

    let raw = resp.text().await?;
    trace!(raw = %raw, "chat response");
    let chat: ChatResponse = serde_json::from_str(&raw)?;
    let content = chat
        .choices
        .first()
        .ok_or_else(|| anyhow!("missing chat choice"))?
        .message
        .content
        .trim()
        .to_string();

    Ok(content)
}

/// Whether an upstream failure looks like an exhausted quota or billing
/// problem rather than a transient error.
pub fn is_quota_error(err: &anyhow::Error) -> bool {
    let msg = err.to_string();
    msg.contains("quota") || msg.contains("billing") || msg.contains("exceeded")
}
