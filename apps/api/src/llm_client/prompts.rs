// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting pieces.

use super::ChatMessage;

/// Persona shared by every connection-analysis prompt.
pub const CONNECTION_ANALYST_SYSTEM: &str =
    "You are an AI expert in analyzing LinkedIn connection data.";

/// Which kind of document an uploaded file is, as the model should hear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    LinkedinProfile,
    Cv,
}

impl DocumentKind {
    pub fn describe(self) -> &'static str {
        match self {
            DocumentKind::LinkedinProfile => "LinkedIn profile",
            DocumentKind::Cv => "CV",
        }
    }
}

/// Wraps an uploaded document as its own user message.
pub fn document_message(kind: DocumentKind, file_name: &str, content: &str) -> ChatMessage {
    ChatMessage::user(format!(
        "Here is my {} content from file {}:\n\n{}",
        kind.describe(),
        file_name,
        content
    ))
}
