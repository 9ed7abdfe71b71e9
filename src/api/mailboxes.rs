//! Inbox / Sent / Drafts listing endpoints.

use axum::extract::{Query, State};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::mailbox::MailboxParams;

use super::{AppState, CurrentUser};

pub async fn inbox(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<MailboxParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = state.mailbox.inbox(user_id, &params).await?;
    Ok(Json(json!({ "page": page })))
}

pub async fn sent(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<MailboxParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = state.mailbox.sent(user_id, &params).await?;
    Ok(Json(json!({ "page": page })))
}

pub async fn drafts(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<MailboxParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = state.mailbox.drafts(user_id, &params).await?;
    Ok(Json(json!({ "page": page })))
}
