//! Project membership management and project creation.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db::{is_unique_violation, MembershipResolver, ProjectRepository};
use crate::error::AppError;

use super::{AppState, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct MembershipActionRequest {
    /// "join" or "leave"
    pub action: String,
    pub project_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The caller's memberships plus the projects still open to join.
pub async fn context(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_projects = MembershipResolver::projects_of(&state.pool, user_id).await?;
    let available_projects = MembershipResolver::joinable_projects(&state.pool, user_id).await?;

    Ok(Json(json!({
        "user_projects": user_projects,
        "available_projects": available_projects,
    })))
}

pub async fn membership_action(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<MembershipActionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = ProjectRepository::get(&state.pool, req.project_id)
        .await?
        .ok_or(AppError::NotFound("project"))?;

    let message = match req.action.as_str() {
        "join" => {
            MembershipResolver::add_member(&state.pool, project.id, user_id).await?;
            format!("Successfully joined project: {}", project.name)
        }
        "leave" => {
            MembershipResolver::remove_member(&state.pool, project.id, user_id).await?;
            format!("Successfully left project: {}", project.name)
        }
        _ => return Err(AppError::invalid("action", "Unknown action.")),
    };

    Ok(Json(json!({ "success": true, "message": message })))
}

/// Create a project. The creator is added as a member explicitly; nothing at
/// the storage layer implies creator membership.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("name", "Project name is required."));
    }

    let mut tx = state.pool.begin().await?;

    let project = match ProjectRepository::create(&mut *tx, name, &req.description, user_id).await {
        Ok(project) => project,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::invalid(
                "name",
                "A project with this name already exists.",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    MembershipResolver::add_member(&mut *tx, project.id, user_id).await?;

    tx.commit().await?;

    Ok(Json(json!({
        "success": true,
        "project": project,
        "message": format!("Project \"{}\" created successfully!", project.name),
    })))
}
