//! Registration: account provisioning plus the initial project selection.
//!
//! Profile/membership setup happens exactly once, inside the registration
//! transaction. Read paths never lazily create memberships or default
//! projects.

use sqlx::PgPool;

use crate::db::{is_unique_violation, MembershipResolver, ProjectRepository, UserRepository};
use crate::error::AppError;
use crate::models::{Project, User};

/// How the new account gets its first project.
#[derive(Debug, Clone)]
pub enum ProjectChoice {
    /// Create a new project and join it. The creator is added as a member
    /// explicitly.
    New { name: String, description: String },
    /// Join an already-existing project.
    Existing { project_id: i64 },
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub project_choice: ProjectChoice,
}

#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub user: User,
    pub project: Project,
}

#[derive(Clone)]
pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, account: &NewAccount) -> Result<RegisteredAccount, AppError> {
        let username = account.username.trim();
        if username.is_empty() {
            return Err(AppError::invalid("username", "This field is required."));
        }
        if let ProjectChoice::New { name, .. } = &account.project_choice {
            if name.trim().is_empty() {
                return Err(AppError::invalid(
                    "new_project_name",
                    "Project name is required when creating a new project.",
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let user = match UserRepository::insert(
            &mut *tx,
            username,
            account.first_name.trim(),
            account.last_name.trim(),
            account.email.trim(),
        )
        .await
        {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::invalid(
                    "username",
                    "A user with that username already exists.",
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let project = match &account.project_choice {
            ProjectChoice::New { name, description } => {
                match ProjectRepository::create(&mut *tx, name.trim(), description, user.id).await {
                    Ok(project) => project,
                    Err(e) if is_unique_violation(&e) => {
                        return Err(AppError::invalid(
                            "new_project_name",
                            "A project with this name already exists.",
                        ));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            ProjectChoice::Existing { project_id } => ProjectRepository::get(&mut *tx, *project_id)
                .await?
                .ok_or_else(|| {
                    AppError::invalid(
                        "existing_project",
                        "Please select an existing project to join.",
                    )
                })?,
        };

        MembershipResolver::add_member(&mut *tx, project.id, user.id).await?;

        tx.commit().await?;

        Ok(RegisteredAccount { user, project })
    }
}
