//! Registration endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::{NewAccount, ProjectChoice};
use crate::db::ProjectRepository;
use crate::error::AppError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    /// "new" or "existing"
    pub project_choice: String,
    #[serde(default)]
    pub new_project_name: Option<String>,
    #[serde(default)]
    pub new_project_description: Option<String>,
    #[serde(default)]
    pub existing_project: Option<i64>,
}

/// Form-population data: the projects available to join.
pub async fn context(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let projects = ProjectRepository::list_all(&state.pool).await?;
    Ok(Json(json!({ "projects": projects })))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project_choice = match req.project_choice.as_str() {
        "new" => ProjectChoice::New {
            name: req.new_project_name.unwrap_or_default(),
            description: req.new_project_description.unwrap_or_default(),
        },
        "existing" => match req.existing_project {
            Some(project_id) => ProjectChoice::Existing { project_id },
            None => {
                return Err(AppError::invalid(
                    "existing_project",
                    "Please select an existing project to join.",
                ))
            }
        },
        _ => {
            return Err(AppError::invalid(
                "project_choice",
                "Select a valid choice.",
            ))
        }
    };

    let account = NewAccount {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        project_choice,
    };

    let registered = state.registration.register(&account).await?;

    Ok(Json(json!({
        "success": true,
        "user": registered.user,
        "project": registered.project,
        "message": format!("Account created successfully! Welcome to {}!", registered.project.name),
    })))
}
