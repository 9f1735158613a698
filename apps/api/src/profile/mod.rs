// Profile and CV review
// Implements: profile analysis, audience-targeted optimization, custom prompts, chat.
// All LLM calls go through llm_client; uploads are decoded by the uploads module.

pub mod handlers;
pub mod prompts;
