use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatCompletion;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing here is per-user.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Production: `LlmClient`; tests use a canned stub.
    pub llm: Arc<dyn ChatCompletion>,
    pub config: Config,
}
