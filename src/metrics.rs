//! In-process bookkeeping for provider performance and usage counters.
//!
//! Two registries back the read-only endpoints: per-provider latency and
//! success-rate figures, and aggregate usage counters broken down by category
//! and provider. Both live for the lifetime of the process; nothing is
//! persisted.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::ai::routing::{Category, Provider};

/// Rolling per-provider figures, updated after every optimization attempt
/// cycle.
#[derive(Debug, Clone, Default)]
pub struct ModelStats {
    pub total_requests: u64,
    pub total_latency_ms: u64,
    /// Rolling mean of successes in `[0, 1]`.
    pub success_rate: f64,
    /// Epoch milliseconds of the most recent request.
    pub last_used_ms: i64,
}

impl ModelStats {
    fn record(&mut self, latency_ms: u64, success: bool) {
        self.total_requests += 1;
        self.total_latency_ms += latency_ms;
        let hit = if success { 1.0 } else { 0.0 };
        self.success_rate =
            (self.success_rate * (self.total_requests - 1) as f64 + hit) / self.total_requests as f64;
        self.last_used_ms = Utc::now().timestamp_millis();
    }
}

/// Per-provider view served by `GET /api/optimize-prompt`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatsView {
    pub total_requests: u64,
    pub total_latency: u64,
    /// Success rate as a rounded percentage.
    pub success_rate: u32,
    pub last_used: i64,
    pub average_latency: u64,
}

impl From<&ModelStats> for ModelStatsView {
    fn from(stats: &ModelStats) -> Self {
        let average = if stats.total_requests == 0 {
            0
        } else {
            ((stats.total_latency_ms as f64) / (stats.total_requests as f64)).round() as u64
        };
        Self {
            total_requests: stats.total_requests,
            total_latency: stats.total_latency_ms,
            success_rate: (stats.success_rate * 100.0).round() as u32,
            last_used: stats.last_used_ms,
            average_latency: average,
        }
    }
}

/// Aggregate usage counters served by `GET /api/stats`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub category_breakdown: CategoryBreakdown,
    pub model_usage: ModelUsage,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryBreakdown {
    pub creative: u64,
    pub coding: u64,
    pub business: u64,
    pub academic: u64,
}

impl CategoryBreakdown {
    fn bump(&mut self, category: Category) {
        match category {
            Category::Creative => self.creative += 1,
            Category::Coding => self.coding += 1,
            Category::Business => self.business += 1,
            Category::Academic => self.academic += 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelUsage {
    pub groq: u64,
    pub openai: u64,
}

impl ModelUsage {
    fn bump(&mut self, provider: Provider) {
        match provider {
            Provider::Groq => self.groq += 1,
            Provider::OpenAi => self.openai += 1,
        }
    }
}

/// Shared registry written by the optimize handler and read by the stats
/// endpoints.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    models: Mutex<HashMap<Provider, ModelStats>>,
    usage: Mutex<UsageStats>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one optimization request against the provider
    /// that ultimately handled (or failed) it.
    pub async fn record_model(&self, provider: Provider, latency_ms: u64, success: bool) {
        let mut models = self.models.lock().await;
        models.entry(provider).or_default().record(latency_ms, success);
    }

    /// Record one request in the aggregate usage counters.
    pub async fn record_usage(&self, category: Category, provider: Provider, success: bool) {
        let mut usage = self.usage.lock().await;
        usage.total_requests += 1;
        if success {
            usage.successful_requests += 1;
        } else {
            usage.failed_requests += 1;
        }
        usage.category_breakdown.bump(category);
        usage.model_usage.bump(provider);
    }

    pub async fn model_snapshot(&self) -> HashMap<String, ModelStatsView> {
        let models = self.models.lock().await;
        models
            .iter()
            .map(|(provider, stats)| (provider.as_str().to_string(), ModelStatsView::from(stats)))
            .collect()
    }

    pub async fn usage_snapshot(&self) -> UsageStats {
        self.usage.lock().await.clone()
    }
}
