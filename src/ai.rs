// Provider integration: prompt templates, request routing, chat calls and
// the cross-provider fallback loop.

pub mod client;
pub mod config;
pub mod optimizer;
pub mod prompts;
pub mod routing;

pub use config::AiConfig;
pub use optimizer::{optimize, OptimizeRequest, Optimized, MAX_ATTEMPTS};
pub use routing::{select_provider, Category, ModelChoice, Provider};
