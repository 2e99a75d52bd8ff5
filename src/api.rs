use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{Extension, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::config::AiConfig;
use crate::ai::optimizer::{optimize, OptimizeRequest};
use crate::ai::routing::{complexity, select_provider, Category, ModelChoice};
use crate::messages;
use crate::metrics::{MetricsRegistry, ModelStatsView, UsageStats};
use crate::ratelimit::{RateLimitDecision, RateLimiter};

#[derive(Clone, Copy, Debug)]
pub struct RateLimitConfig {
    pub max_requests: u64,
    pub window: Duration,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub rate_limit: Option<RateLimitConfig>,
    pub max_input_chars: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rate_limit: Some(RateLimitConfig {
                max_requests: 10,
                window: Duration::from_secs(60),
            }),
            max_input_chars: 2000,
        }
    }
}

#[derive(Clone)]
struct AppState {
    ai: AiConfig,
    http: reqwest::Client,
    metrics: Arc<MetricsRegistry>,
    limiter: Option<Arc<RateLimiter>>,
    max_input_chars: usize,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

/// Incoming optimize request. Fields stay loosely typed so a wrong type in
/// one field yields the matching validation error instead of a decode
/// rejection for the whole body.
#[derive(Deserialize)]
struct OptimizeBody {
    #[serde(default)]
    input: Option<serde_json::Value>,
    #[serde(default)]
    category: Option<serde_json::Value>,
    #[serde(default)]
    model: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeResponse {
    optimized_prompt: String,
    metadata: OptimizeMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeMetadata {
    model: &'static str,
    category: Category,
    timestamp: String,
    latency: u64,
    input_complexity: usize,
    optimization: &'static str,
    attempts: u32,
}

#[derive(Debug, Serialize)]
struct ModelMetricsResponse {
    metrics: HashMap<String, ModelStatsView>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    services: ServiceStatus,
}

#[derive(Debug, Serialize)]
struct ServiceStatus {
    groq: &'static str,
    openai: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

pub fn router(ai: AiConfig, config: ApiConfig) -> Router {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(ai.request_timeout_secs))
        .build()
        .expect("failed to build HTTP client");
    let limiter = config
        .rate_limit
        .map(|rl| Arc::new(RateLimiter::new(rl.max_requests, rl.window)));
    let state = AppState {
        ai,
        http,
        metrics: Arc::new(MetricsRegistry::new()),
        limiter,
        max_input_chars: config.max_input_chars,
    };

    Router::new()
        .route(
            "/api/optimize-prompt",
            post(optimize_prompt).get(model_metrics),
        )
        .route("/api/stats", get(usage_stats))
        .route("/api/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(assign_request_id))
}

async fn optimize_prompt(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();

    if let Some(limiter) = &state.limiter {
        let key = rate_limit_key(&headers);
        let decision = limiter.check(&key).await;
        if !decision.allowed {
            tracing::debug!(
                request_id = %context.request_id,
                client = %key,
                "rate limit exceeded"
            );
            return rate_limited_response(&decision);
        }
    }

    let payload: OptimizeBody = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(
                request_id = %context.request_id,
                error = %err,
                "unreadable request body"
            );
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, messages::UNEXPECTED_ERROR);
        }
    };

    let input = match payload.input.as_ref().and_then(|v| v.as_str()) {
        Some(input) if !input.is_empty() => input,
        _ => return error_response(StatusCode::BAD_REQUEST, messages::INVALID_INPUT),
    };
    if input.chars().count() > state.max_input_chars {
        return error_response(StatusCode::BAD_REQUEST, messages::INPUT_TOO_LONG);
    }
    let category = match payload
        .category
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(Category::parse)
    {
        Some(category) => category,
        None => return error_response(StatusCode::BAD_REQUEST, messages::INVALID_CATEGORY),
    };
    let requested = payload
        .model
        .as_ref()
        .and_then(|v| v.as_str())
        .unwrap_or("auto");
    let choice = ModelChoice::parse(requested);
    let provider = select_provider(input, choice, category);

    tracing::info!(
        request_id = %context.request_id,
        %category,
        requested_model = requested,
        selected_model = %provider,
        input_length = input.chars().count(),
        complexity = complexity(input),
        "processing prompt optimization"
    );

    let request = OptimizeRequest {
        input: input.to_string(),
        category,
        provider,
    };

    match optimize(&state.http, &state.ai, &state.metrics, &request, started).await {
        Ok(optimized) => {
            state
                .metrics
                .record_usage(category, optimized.provider, true)
                .await;
            tracing::info!(
                request_id = %context.request_id,
                output_length = optimized.text.chars().count(),
                latency_ms = optimized.latency_ms,
                model = %optimized.provider,
                attempts = optimized.attempts,
                "successfully optimized prompt"
            );
            let response = OptimizeResponse {
                optimized_prompt: optimized.text,
                metadata: OptimizeMetadata {
                    model: optimized.provider.as_str(),
                    category,
                    timestamp: now_iso(),
                    latency: optimized.latency_ms,
                    input_complexity: complexity(input),
                    optimization: if choice.is_manual() {
                        "manual"
                    } else {
                        "intelligent"
                    },
                    attempts: optimized.attempts,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(failure) => {
            state
                .metrics
                .record_usage(category, failure.provider, false)
                .await;
            tracing::error!(
                request_id = %context.request_id,
                attempts = failure.attempts,
                model = %failure.provider,
                error = %failure.error,
                "failed to optimize prompt"
            );
            let message = failure.error.to_string();
            // "exceeded" alone is enough to switch providers mid-loop, but
            // only an explicit quota or billing failure reports as 503.
            if message.contains("quota") || message.contains("billing") {
                error_response(StatusCode::SERVICE_UNAVAILABLE, messages::QUOTA_EXCEEDED)
            } else {
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::OPTIMIZATION_FAILED,
                )
            }
        }
    }
}

async fn model_metrics(State(state): State<AppState>) -> Response {
    let metrics = state.metrics.model_snapshot().await;
    (
        StatusCode::OK,
        Json(ModelMetricsResponse {
            metrics,
            timestamp: now_iso(),
        }),
    )
        .into_response()
}

async fn usage_stats(State(state): State<AppState>) -> Response {
    let usage: UsageStats = state.metrics.usage_snapshot().await;
    (StatusCode::OK, Json(usage)).into_response()
}

async fn health(State(state): State<AppState>) -> Response {
    let response = HealthResponse {
        status: "healthy",
        timestamp: now_iso(),
        services: ServiceStatus {
            groq: configured_label(state.ai.groq.api_key.is_some()),
            openai: configured_label(state.ai.openai.api_key.is_some()),
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn configured_label(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "missing"
    }
}

/// Client key for rate limiting: first hop of `x-forwarded-for`, then
/// `x-real-ip`, then a shared bucket.
fn rate_limit_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        return forwarded.split(',').next().unwrap_or("").trim().to_string();
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn rate_limited_response(decision: &RateLimitDecision) -> Response {
    let mut response = error_response(
        StatusCode::TOO_MANY_REQUESTS,
        messages::RATE_LIMIT_EXCEEDED,
    );
    let headers = response.headers_mut();
    if let Ok(value) = decision.reset_at_ms.to_string().parse() {
        headers.insert(HeaderName::from_static("x-ratelimit-reset"), value);
    }
    if let Ok(value) = decision.retry_after_secs().to_string().parse() {
        headers.insert(RETRY_AFTER, value);
    }
    response
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    let header_value = match request_id.parse() {
        Ok(value) => value,
        Err(_) => {
            return response;
        }
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-request-id"), header_value);
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}
