//! AJAX recipient dropdown: members of a project, excluding the caller.
//!
//! Contract: `{"users": [{"id", "name"}]}`. Errors ride along in the same
//! shape with an empty user list, so a stale dropdown never breaks the page.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db::{MembershipResolver, ProjectRepository};
use crate::error::AppError;

use super::{AppState, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct ProjectUsersParams {
    #[serde(default)]
    pub project_id: Option<String>,
}

pub async fn project_users(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<ProjectUsersParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let raw = params.project_id.as_deref().unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(Json(json!({ "error": "No project ID provided", "users": [] })));
    }

    let project = match raw.parse::<i64>() {
        Ok(id) => ProjectRepository::get(&state.pool, id).await?,
        Err(_) => None,
    };
    let Some(project) = project else {
        return Ok(Json(json!({ "error": "Project not found", "users": [] })));
    };

    let users = MembershipResolver::eligible_recipients(&state.pool, project.id, user_id)
        .await?
        .into_iter()
        .map(|u| json!({ "id": u.id, "name": u.display_name() }))
        .collect::<Vec<_>>();

    Ok(Json(json!({ "users": users })))
}
