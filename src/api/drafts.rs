//! Draft edit endpoint: update, send or delete one draft.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::compose::ComposeInput;
use crate::db::MembershipResolver;
use crate::error::AppError;

use super::{AppState, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct DraftActionRequest {
    /// "send", "update" or "delete"
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

/// The draft plus the recipient choices its current project allows.
pub async fn edit_context(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(draft_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = state.engine.draft_for_edit(user_id, draft_id).await?;

    let recipients =
        MembershipResolver::eligible_recipients(&state.pool, draft.project_id, user_id)
            .await?
            .into_iter()
            .map(|u| json!({ "id": u.id, "name": u.display_name() }))
            .collect::<Vec<_>>();

    Ok(Json(json!({ "draft": draft, "recipients": recipients })))
}

pub async fn edit_action(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(draft_id): Path<i64>,
    Json(req): Json<DraftActionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    match req.action.as_str() {
        "send" => {
            let mail = state.engine.send_draft(user_id, draft_id).await?;
            Ok(Json(json!({
                "success": true,
                "mail_id": mail.id,
                "message": "Mail sent successfully!",
            })))
        }
        "update" => {
            let input = ComposeInput {
                project: req.project,
                recipient: req.recipient,
                subject: req.subject,
                body: req.body,
            };
            let draft = state.engine.update_draft(user_id, draft_id, &input).await?;
            Ok(Json(json!({
                "success": true,
                "draft": draft,
                "message": "Draft updated successfully!",
            })))
        }
        "delete" => {
            state.engine.discard_draft(user_id, draft_id).await?;
            Ok(Json(json!({
                "success": true,
                "message": "Draft deleted successfully!",
            })))
        }
        _ => Err(AppError::invalid("action", "Unknown action.")),
    }
}
