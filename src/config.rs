use std::env;

use crate::ai::config::AiConfig;

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub rate_limit_max_requests: u64,
    pub rate_limit_window_secs: u64,
    pub max_input_chars: usize,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", 10),
            rate_limit_window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", 60),
            max_input_chars: parse_env("MAX_INPUT_CHARS", 2000),
            ai: AiConfig::from_env(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
