//! Project queries: creation (unique name) and lookups.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::models::Project;

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    name: String,
    description: String,
    created_by: i64,
    created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

const PROJECT_COLUMNS: &str = "id, name, description, created_by, created_at";

pub struct ProjectRepository;

impl ProjectRepository {
    /// Insert a project. A duplicate name surfaces as a unique-violation
    /// `sqlx::Error`; callers map it to a validation failure.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        name: &str,
        description: &str,
        created_by: i64,
    ) -> Result<Project, sqlx::Error> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(exec)
        .await?;

        Ok(row.into())
    }

    pub async fn get(
        exec: impl PgExecutor<'_>,
        id: i64,
    ) -> Result<Option<Project>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Every project, name-ascending. Feeds the registration "join existing"
    /// dropdown.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY name"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
