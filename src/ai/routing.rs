use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prompt category chosen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Creative,
    Coding,
    Business,
    Academic,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Creative,
        Category::Coding,
        Category::Business,
        Category::Academic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Creative => "creative",
            Category::Coding => "coding",
            Category::Business => "business",
            Category::Academic => "academic",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "creative" => Some(Category::Creative),
            "coding" => Some(Category::Coding),
            "business" => Some(Category::Business),
            "academic" => Some(Category::Academic),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Groq,
    OpenAi,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Groq, Provider::OpenAi];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the client asked the provider to be picked.
///
/// Anything other than an exact provider name (including the default
/// `"auto"`) means the service chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    Auto,
    Manual(Provider),
}

impl ModelChoice {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "groq" => ModelChoice::Manual(Provider::Groq),
            "openai" => ModelChoice::Manual(Provider::OpenAi),
            _ => ModelChoice::Auto,
        }
    }

    pub fn is_manual(self) -> bool {
        matches!(self, ModelChoice::Manual(_))
    }
}

/// Word count used both for routing and for the response metadata.
///
/// Splits on single spaces, not arbitrary whitespace; repeated spaces
/// produce empty tokens that still count.
pub fn complexity(input: &str) -> usize {
    input.split(' ').count()
}

fn special_requirements_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(detailed|complex|comprehensive|thorough|in-depth)\b")
            .expect("special requirements regex")
    })
}

/// Pick the provider for a request.
///
/// An explicit client choice always wins. Otherwise long or demanding
/// academic/business prompts go to OpenAI, short creative/coding prompts go
/// to Groq for speed, and Groq is the default.
pub fn select_provider(input: &str, choice: ModelChoice, category: Category) -> Provider {
    if let ModelChoice::Manual(provider) = choice {
        return provider;
    }

    let input_length = input.chars().count();
    let complexity = complexity(input);
    let has_special_requirements = special_requirements_re().is_match(input);

    if matches!(category, Category::Academic | Category::Business)
        && (complexity > 20 || has_special_requirements)
    {
        return Provider::OpenAi;
    }

    if matches!(category, Category::Creative | Category::Coding)
        && complexity < 15
        && input_length < 200
    {
        return Provider::Groq;
    }

    Provider::Groq
}
