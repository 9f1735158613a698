// Profile-optimization prompt templates.
// All prompts for the profile module are defined here.

pub const DEFAULT_GOAL: &str = "recruiters";

pub const PROFILE_REVIEW_SYSTEM: &str = "You are an expert LinkedIn profile optimizer with deep \
knowledge of professional branding and industry trends.";

pub const OPTIMIZE_SYSTEM: &str = "You are an AI expert in optimizing LinkedIn profiles. Analyze \
the provided LinkedIn profile and CV to give detailed suggestions for improvement to attract {goal}.";

pub const OPTIMIZE_PROMPT: &str = "Please optimize my LinkedIn profile to attract more {goal}. \
I'm uploading my profile and CV for analysis.";

pub const ASSISTANT_SYSTEM: &str = "You are an AI assistant specializing in LinkedIn profile \
optimization and career development.";

/// Placeholder users may put in a saved prompt.
pub const GOAL_PLACEHOLDER: &str = "[goal]";

pub fn profile_review_prompt(goal: &str, linkedin_text: &str, cv_text: Option<&str>) -> String {
    let cv_section = cv_text
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!("CV/Resume Content:\n{t}"))
        .unwrap_or_default();
    format!(
        "Analyze this professional profile with the goal of {goal}.\n\n\
         LinkedIn Profile Content:\n{linkedin_text}\n\n\
         {cv_section}\n\n\
         Please provide recommendations in the following format:\n\
         1. Profile Strengths\n\
         2. Areas for Improvement\n\
         3. Specific Recommendations\n\
         4. Industry Alignment\n\
         5. Additional Suggestions for Achieving Goal: {goal}"
    )
}

/// Replaces every `[goal]` in a user-authored prompt.
pub fn apply_goal(custom_prompt: &str, goal: &str) -> String {
    custom_prompt.replace(GOAL_PLACEHOLDER, goal)
}
