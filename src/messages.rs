//! User-facing strings returned by the API.
//!
//! Keep all response messages in this module so they stay in one place and are
//! easy to update.

pub const RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded. Please try again later.";

pub const INVALID_INPUT: &str = "Valid input text is required";
pub const INPUT_TOO_LONG: &str = "Input text is too long (max 2000 characters)";
pub const INVALID_CATEGORY: &str = "Valid category is required";

pub const QUOTA_EXCEEDED: &str =
    "AI service quota exceeded. Please try again later or contact support.";
pub const OPTIMIZATION_FAILED: &str =
    "Failed to optimize prompt after multiple attempts. Please try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";
