//! Compose endpoint: direct send or save-as-draft.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::compose::ComposeInput;
use crate::db::MembershipResolver;
use crate::error::AppError;

use super::{AppState, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    /// "send" or "draft"
    pub action: String,
    #[serde(default)]
    pub project: Option<i64>,
    #[serde(default)]
    pub recipient: Option<i64>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl ComposeRequest {
    fn input(&self) -> ComposeInput {
        ComposeInput {
            project: self.project,
            recipient: self.recipient,
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }
}

/// Form-population data: the caller's projects. Recipients are fetched per
/// selected project via /api/project-users.
pub async fn context(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let projects = MembershipResolver::projects_of(&state.pool, user_id).await?;
    Ok(Json(json!({ "projects": projects })))
}

pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<ComposeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    match req.action.as_str() {
        "send" => {
            let mail = state.engine.send(user_id, &req.input()).await?;
            Ok(Json(json!({
                "success": true,
                "mail_id": mail.id,
                "message": "Mail sent successfully!",
            })))
        }
        "draft" => {
            let draft = state.engine.save_draft(user_id, &req.input()).await?;
            Ok(Json(json!({
                "success": true,
                "draft_id": draft.id,
                "message": "Draft saved successfully!",
            })))
        }
        _ => Err(AppError::invalid("action", "Unknown action.")),
    }
}
