//! Membership Resolver: who belongs to which project, and who a given
//! member may address.
//!
//! All reads are pure. An unknown project id yields an empty set rather than
//! an error, so recipient dropdowns simply come back empty.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::models::{Project, User};

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<MemberRow> for User {
    fn from(r: MemberRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
        }
    }
}

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

pub struct MembershipResolver;

impl MembershipResolver {
    /// True iff a membership row exists for the pair. Never derived from
    /// mail or draft history.
    pub async fn is_member(
        exec: impl PgExecutor<'_>,
        user_id: i64,
        project_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM project_members
                WHERE user_id = $1 AND project_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(exec)
        .await
    }

    /// All members of `project_id` except `exclude_user`, username-ascending.
    /// This is the request-scoped allowed-recipient set: always recomputed
    /// from the submitted project id, never cached across requests.
    pub async fn eligible_recipients(
        exec: impl PgExecutor<'_>,
        project_id: i64,
        exclude_user: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT u.id, u.username, u.first_name, u.last_name, u.email
            FROM users u
            JOIN project_members pm ON pm.user_id = u.id
            WHERE pm.project_id = $1 AND u.id <> $2
            ORDER BY u.username
            "#,
        )
        .bind(project_id)
        .bind(exclude_user)
        .fetch_all(exec)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Projects the user belongs to, name-ascending.
    pub async fn projects_of(
        exec: impl PgExecutor<'_>,
        user_id: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created_by, p.created_at
            FROM projects p
            JOIN project_members pm ON pm.project_id = p.id
            WHERE pm.user_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(user_id)
        .fetch_all(exec)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Projects the user is NOT a member of, name-ascending.
    pub async fn joinable_projects(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT p.id, p.name, p.description, p.created_by, p.created_at
            FROM projects p
            WHERE NOT EXISTS(
                SELECT 1 FROM project_members pm
                WHERE pm.project_id = p.id AND pm.user_id = $1
            )
            ORDER BY p.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Idempotent join.
    pub async fn add_member(
        exec: impl PgExecutor<'_>,
        project_id: i64,
        user_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(exec)
        .await?;
        Ok(())
    }

    pub async fn remove_member(
        exec: impl PgExecutor<'_>,
        project_id: i64,
        user_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(exec)
            .await?;
        Ok(())
    }
}
