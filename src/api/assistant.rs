//! AI draft generation endpoint.
//!
//! Accepts a form-encoded `prompt` and answers
//! `{"success": true, "subject", "body"}` or `{"error"}`. Provider failures
//! never affect any other in-flight operation.

use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;

use crate::ai::AssistantError;
use crate::error::AppError;

use super::{AppState, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: Option<String>,
}

pub async fn generate_ai_draft(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Form(form): Form<PromptForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let prompt = form.prompt.as_deref().unwrap_or("").trim().to_string();
    if prompt.is_empty() {
        return Err(AssistantError::EmptyPrompt.into());
    }

    let assistant = state
        .assistant
        .as_ref()
        .ok_or(AppError::Assistant(AssistantError::NotConfigured))?;

    let draft = assistant.generate(&prompt).await?;

    Ok(Json(json!({
        "success": true,
        "subject": draft.subject,
        "body": draft.body,
    })))
}
