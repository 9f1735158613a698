//! Axum route handlers for profile review, optimization, custom prompts and chat.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{document_message, DocumentKind};
use crate::llm_client::{ApiKey, ChatMessage, CompletionOptions, Usage};
use crate::profile::prompts::{
    apply_goal, profile_review_prompt, ASSISTANT_SYSTEM, DEFAULT_GOAL, OPTIMIZE_PROMPT,
    OPTIMIZE_SYSTEM, PROFILE_REVIEW_SYSTEM,
};
use crate::state::AppState;
use crate::uploads::extract::{extract_text, extract_text_or_placeholder};
use crate::uploads::UploadForm;

/// Shorter replies for the interactive routes.
const SHORT_REPLY_TOKENS: u32 = 1500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize)]
pub struct ProfileAnalysisResponse {
    pub analysis: String,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Structured review of one LinkedIn profile export, optionally alongside a CV.
/// The profile must be readable; an unreadable CV is skipped.
pub async fn handle_profile_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProfileAnalysisResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let api_key = form.api_key()?;
    let goal = form.text("goal").unwrap_or(DEFAULT_GOAL);
    let linkedin = form
        .file("linkedinFile")
        .ok_or_else(|| AppError::Validation("No LinkedIn PDF data provided".to_string()))?;

    let linkedin_text = extract_text(linkedin)
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let cv_text = match form.file("cvFile") {
        Some(cv) => match extract_text(cv).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(file = %cv.file_name, "CV extraction failed, continuing without it: {e}");
                None
            }
        },
        None => None,
    };

    let messages = vec![
        ChatMessage::system(PROFILE_REVIEW_SYSTEM),
        ChatMessage::user(profile_review_prompt(goal, &linkedin_text, cv_text.as_deref())),
    ];
    info!(
        goal,
        estimated_words = estimate_words(&messages),
        "Requesting profile analysis"
    );

    let completion = state
        .llm
        .complete(&api_key, &messages, CompletionOptions::with_max_tokens(SHORT_REPLY_TOKENS))
        .await?;

    Ok(Json(ProfileAnalysisResponse {
        analysis: completion.content,
        success: true,
    }))
}

/// POST /api/optimize-profile
///
/// Improvement suggestions aimed at a target audience (default: recruiters).
pub async fn handle_optimize_profile(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CompletionResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let api_key = form.api_key()?;
    if form.file("linkedinFiles").is_none() {
        return Err(AppError::Validation(
            "LinkedIn profile file is required".to_string(),
        ));
    }
    let goal = form.text("goal").unwrap_or(DEFAULT_GOAL);

    let mut messages = vec![
        ChatMessage::system(OPTIMIZE_SYSTEM.replace("{goal}", goal)),
        ChatMessage::user(OPTIMIZE_PROMPT.replace("{goal}", goal)),
    ];
    messages.extend(document_messages(&form).await);

    complete(&state, &api_key, &messages, CompletionOptions::default()).await
}

/// POST /api/custom-prompt
///
/// Runs a user-authored prompt (with `[goal]` substituted) over the uploads.
pub async fn handle_custom_prompt(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CompletionResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let api_key = form.api_key()?;
    let custom_prompt = form
        .text("customPrompt")
        .ok_or_else(|| AppError::Validation("Custom prompt is required".to_string()))?;
    let goal = form.text("goal").unwrap_or_default();

    let mut messages = vec![
        ChatMessage::system(ASSISTANT_SYSTEM),
        ChatMessage::user(apply_goal(custom_prompt, goal)),
    ];
    messages.extend(document_messages(&form).await);

    complete(&state, &api_key, &messages, CompletionOptions::default()).await
}

/// POST /api/chat
///
/// Free-form conversation; the client sends the full message history each time.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let api_key = request
        .api_key
        .as_deref()
        .and_then(ApiKey::new)
        .ok_or_else(|| AppError::Validation("API key is required".to_string()))?;
    let messages = request
        .messages
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("Valid messages array is required".to_string()))?;

    complete(
        &state,
        &api_key,
        &messages,
        CompletionOptions::with_max_tokens(SHORT_REPLY_TOKENS),
    )
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn complete(
    state: &AppState,
    api_key: &ApiKey,
    messages: &[ChatMessage],
    options: CompletionOptions,
) -> Result<Json<CompletionResponse>, AppError> {
    let completion = state.llm.complete(api_key, messages, options).await?;
    Ok(Json(CompletionResponse {
        content: completion.content,
        usage: completion.usage,
    }))
}

/// One user message per uploaded profile, then per CV, in upload order.
async fn document_messages(form: &UploadForm) -> Vec<ChatMessage> {
    let uploads = form
        .files("linkedinFiles")
        .map(|f| (DocumentKind::LinkedinProfile, f))
        .chain(form.files("cvFiles").map(|f| (DocumentKind::Cv, f)));

    let mut messages = Vec::new();
    for (kind, file) in uploads {
        let content = extract_text_or_placeholder(file).await;
        info!(file = %file.file_name, kind = kind.describe(), "Processed upload");
        messages.push(document_message(kind, &file.file_name, &content));
    }
    messages
}

/// Whitespace word count, logged as a rough size check before sending.
fn estimate_words(messages: &[ChatMessage]) -> usize {
    messages
        .iter()
        .map(|m| m.content.split_whitespace().count())
        .sum()
}
