//! System prompts used when rewriting user input.
//!
//! Centralizing these strings makes it easy to tweak how each category is
//! optimized without digging through the request handling code.

use crate::ai::routing::Category;

/// System prompt for creative prompts (art, writing, design).
pub const CREATIVE_PROMPT: &str = "You are an expert at crafting creative prompts for AI tools. Transform the user's messy input into a well-structured, detailed prompt that will generate amazing creative content. Include specific details about style, mood, composition, colors, and artistic direction. Make it clear and actionable. Focus on visual elements, creative constraints, and desired aesthetic outcomes.";

/// System prompt for coding prompts.
pub const CODING_PROMPT: &str = "You are an expert at crafting coding prompts for AI tools. Transform the user's messy input into a clear, technical prompt that specifies the programming language, framework, functionality, requirements, and any constraints. Include details about code structure, best practices, error handling, testing requirements, and expected output format. Be specific about technical specifications.";

/// System prompt for business prompts.
pub const BUSINESS_PROMPT: &str = "You are an expert at crafting business prompts for AI tools. Transform the user's messy input into a professional, strategic prompt that clearly defines the business context, objectives, target audience, constraints, KPIs, and desired outcomes. Include market context, competitive considerations, and measurable success criteria. Make it actionable and results-focused.";

/// System prompt for academic prompts.
pub const ACADEMIC_PROMPT: &str = "You are an expert at crafting academic prompts for AI tools. Transform the user's messy input into a scholarly, well-structured prompt that specifies the academic level, subject area, research methodology, citation requirements, analytical framework, and depth required. Include specific academic standards, source requirements, and evaluation criteria. Make it precise and academically rigorous.";

pub fn system_prompt(category: Category) -> &'static str {
    match category {
        Category::Creative => CREATIVE_PROMPT,
        Category::Coding => CODING_PROMPT,
        Category::Business => BUSINESS_PROMPT,
        Category::Academic => ACADEMIC_PROMPT,
    }
}

/// Build the user message asking the model to rewrite `input`.
pub fn optimization_prompt(category: Category, input: &str) -> String {
    format!(
        "Transform this messy user input into a perfectly optimized {category} prompt:\n\n\
         \"{input}\"\n\n\
         OPTIMIZATION REQUIREMENTS:\n\
         - Make it clear, specific, and actionable\n\
         - Include all necessary context and requirements\n\
         - Structure it for maximum AI comprehension\n\
         - Add relevant constraints and success criteria\n\
         - Ensure it's 2-4 sentences but comprehensive\n\
         - Focus on {category}-specific best practices\n\n\
         Return ONLY the optimized prompt, nothing else.",
        category = category,
        input = input
    )
}
