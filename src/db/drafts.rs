//! Draft storage and the draft-to-mail promotion transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::models::{display_label, Draft, DraftSummary, Mail};
use crate::pagination::{clamp_page, offset, total_pages, Page, PAGE_SIZE};

#[derive(sqlx::FromRow)]
struct DraftRow {
    id: i64,
    author_id: i64,
    project_id: i64,
    recipient_id: Option<i64>,
    subject: String,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DraftRow> for Draft {
    fn from(r: DraftRow) -> Self {
        Self {
            id: r.id,
            author_id: r.author_id,
            project_id: r.project_id,
            recipient_id: r.recipient_id,
            subject: r.subject,
            body: r.body,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DraftListRow {
    id: i64,
    project_id: i64,
    project_name: String,
    recipient_username: Option<String>,
    recipient_first_name: Option<String>,
    recipient_last_name: Option<String>,
    subject: String,
    updated_at: DateTime<Utc>,
}

impl From<DraftListRow> for DraftSummary {
    fn from(r: DraftListRow) -> Self {
        let recipient = r.recipient_username.map(|username| {
            display_label(
                r.recipient_first_name.as_deref().unwrap_or(""),
                r.recipient_last_name.as_deref().unwrap_or(""),
                &username,
            )
        });
        Self {
            id: r.id,
            project_id: r.project_id,
            project_name: r.project_name,
            recipient,
            subject: r.subject,
            updated_at: r.updated_at,
        }
    }
}

const DRAFT_COLUMNS: &str =
    "id, author_id, project_id, recipient_id, subject, body, created_at, updated_at";

pub struct DraftRepository;

impl DraftRepository {
    pub async fn insert(
        pool: &PgPool,
        author_id: i64,
        project_id: i64,
        recipient_id: Option<i64>,
        subject: &str,
        body: &str,
    ) -> Result<Draft, sqlx::Error> {
        let row = sqlx::query_as::<_, DraftRow>(&format!(
            r#"
            INSERT INTO drafts (author_id, project_id, recipient_id, subject, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DRAFT_COLUMNS}
            "#
        ))
        .bind(author_id)
        .bind(project_id)
        .bind(recipient_id)
        .bind(subject)
        .bind(body)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Draft>, sqlx::Error> {
        let row = sqlx::query_as::<_, DraftRow>(&format!(
            "SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Rewrite the mutable fields; `updated_at` is bumped on every call.
    /// Author and id never change.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        project_id: i64,
        recipient_id: Option<i64>,
        subject: &str,
        body: &str,
    ) -> Result<Draft, sqlx::Error> {
        let row = sqlx::query_as::<_, DraftRow>(&format!(
            r#"
            UPDATE drafts
            SET project_id = $2, recipient_id = $3, subject = $4, body = $5, updated_at = now()
            WHERE id = $1
            RETURNING {DRAFT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(project_id)
        .bind(recipient_id)
        .bind(subject)
        .bind(body)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    pub async fn delete(exec: impl PgExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM drafts WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(())
    }

    /// Promote a draft into a sent mail: insert the mail and delete the
    /// draft in one transaction, so a failure between the two steps leaves
    /// the draft intact and no mail behind.
    pub async fn promote(pool: &PgPool, draft: &Draft, recipient_id: i64) -> Result<Mail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mail = super::MailRepository::insert(
            &mut *tx,
            draft.author_id,
            recipient_id,
            draft.project_id,
            &draft.subject,
            &draft.body,
        )
        .await?;

        Self::delete(&mut *tx, draft.id).await?;

        tx.commit().await?;
        Ok(mail)
    }

    pub async fn page_drafts(
        pool: &PgPool,
        author_id: i64,
        project_filter: Option<i64>,
        search_pattern: Option<&str>,
        requested_page: Option<i64>,
    ) -> Result<Page<DraftSummary>, sqlx::Error> {
        // Search matches subject, body, and the recipient's name fields when
        // a recipient is set.
        let where_clause = r#"
            d.author_id = $1
            AND ($2::bigint IS NULL OR d.project_id = $2)
            AND ($3::text IS NULL
                 OR d.subject ILIKE $3
                 OR d.body ILIKE $3
                 OR r.username ILIKE $3
                 OR r.first_name ILIKE $3
                 OR r.last_name ILIKE $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*)
            FROM drafts d
            LEFT JOIN users r ON r.id = d.recipient_id
            WHERE {where_clause}
            "#
        ))
        .bind(author_id)
        .bind(project_filter)
        .bind(search_pattern)
        .fetch_one(pool)
        .await?;

        let page = clamp_page(requested_page, total);

        let rows = sqlx::query_as::<_, DraftListRow>(&format!(
            r#"
            SELECT
                d.id,
                d.project_id,
                p.name AS project_name,
                r.username   AS recipient_username,
                r.first_name AS recipient_first_name,
                r.last_name  AS recipient_last_name,
                d.subject,
                d.updated_at
            FROM drafts d
            JOIN projects p ON p.id = d.project_id
            LEFT JOIN users r ON r.id = d.recipient_id
            WHERE {where_clause}
            ORDER BY d.updated_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(author_id)
        .bind(project_filter)
        .bind(search_pattern)
        .bind(PAGE_SIZE)
        .bind(offset(page))
        .fetch_all(pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            page,
            total_pages: total_pages(total),
            total_items: total,
        })
    }
}
