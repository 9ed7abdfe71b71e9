//! Identity-store projection queries.

use sqlx::{PgExecutor, PgPool};

use crate::models::User;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
        }
    }
}

pub struct UserRepository;

impl UserRepository {
    pub async fn insert(
        exec: impl PgExecutor<'_>,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, first_name, last_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, first_name, last_name, email
            "#,
        )
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(exec)
        .await?;

        Ok(row.into())
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
