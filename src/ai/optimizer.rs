use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::ai::client::{complete_chat, is_quota_error};
use crate::ai::config::AiConfig;
use crate::ai::prompts::{optimization_prompt, system_prompt};
use crate::ai::routing::{Category, Provider};
use crate::metrics::MetricsRegistry;

/// Upper bound on provider attempts for a single request.
pub const MAX_ATTEMPTS: u32 = 3;

/// A validated optimization request, already routed to a starting provider.
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub input: String,
    pub category: Category,
    pub provider: Provider,
}

/// A successful rewrite.
#[derive(Debug)]
pub struct Optimized {
    pub text: String,
    pub provider: Provider,
    pub attempts: u32,
    pub latency_ms: u64,
}

/// All attempts failed. The provider is the one selected when the loop gave
/// up, which is the entry debited in the metrics.
#[derive(Debug)]
pub struct OptimizeFailure {
    pub provider: Provider,
    pub attempts: u32,
    pub error: anyhow::Error,
}

/// Run the provider fallback loop for one request.
///
/// Starts from the routed provider and retries up to [`MAX_ATTEMPTS`] times:
/// an OpenAI quota failure switches to Groq immediately, any Groq failure
/// tries OpenAI next, and the loop stops once both providers have failed.
/// Per-provider metrics are recorded with latency measured from `started`.
#[instrument(level = "debug", skip_all, fields(category = %request.category, provider = %request.provider))]
pub async fn optimize(
    client: &reqwest::Client,
    ai: &AiConfig,
    metrics: &MetricsRegistry,
    request: &OptimizeRequest,
    started: Instant,
) -> Result<Optimized, OptimizeFailure> {
    let mut provider = request.provider;
    let system = system_prompt(request.category);
    let user = optimization_prompt(request.category, &request.input);

    let mut attempts = 0;
    let mut last_error: Option<anyhow::Error> = None;

    while attempts < MAX_ATTEMPTS {
        attempts += 1;
        debug!(attempt = attempts, %provider, "attempting optimization");

        match complete_chat(client, provider, ai.provider(provider), system, &user).await {
            Ok(text) => {
                let latency_ms = started.elapsed().as_millis() as u64;
                metrics.record_model(provider, latency_ms, true).await;
                return Ok(Optimized {
                    text,
                    provider,
                    attempts,
                    latency_ms,
                });
            }
            Err(err) => {
                warn!(attempt = attempts, %provider, error = %err, "optimization attempt failed");

                let quota = is_quota_error(&err);
                last_error = Some(err);

                if provider == Provider::OpenAi && quota {
                    info!("OpenAI quota exceeded, switching to Groq");
                    provider = Provider::Groq;
                    continue;
                }

                if provider == Provider::Groq && attempts < MAX_ATTEMPTS {
                    info!("Groq failed, trying OpenAI");
                    provider = Provider::OpenAi;
                    continue;
                }

                // Both providers have had their shot.
                if attempts >= 2 {
                    break;
                }
            }
        }
    }

    let latency_ms = started.elapsed().as_millis() as u64;
    metrics.record_model(provider, latency_ms, false).await;

    let error = last_error.unwrap_or_else(|| anyhow::anyhow!("no attempts were made"));
    Err(OptimizeFailure {
        provider,
        attempts,
        error,
    })
}
