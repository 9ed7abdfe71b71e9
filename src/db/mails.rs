//! Mail storage: insert-once records, the monotonic read flag, and the
//! inbox/sent page queries.
//!
//! The storage layer does not re-validate recipient eligibility; that is
//! enforced at compose time against the submitted project.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::models::{display_label, Mail, MailSummary};
use crate::pagination::{clamp_page, offset, total_pages, Page, PAGE_SIZE};

#[derive(sqlx::FromRow)]
struct MailRow {
    id: i64,
    sender_id: i64,
    recipient_id: i64,
    project_id: i64,
    subject: String,
    body: String,
    sent_at: DateTime<Utc>,
    is_read: bool,
}

impl From<MailRow> for Mail {
    fn from(r: MailRow) -> Self {
        Self {
            id: r.id,
            sender_id: r.sender_id,
            recipient_id: r.recipient_id,
            project_id: r.project_id,
            subject: r.subject,
            body: r.body,
            sent_at: r.sent_at,
            is_read: r.is_read,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MailListRow {
    id: i64,
    sender_username: String,
    sender_first_name: String,
    sender_last_name: String,
    recipient_username: String,
    recipient_first_name: String,
    recipient_last_name: String,
    project_id: i64,
    project_name: String,
    subject: String,
    sent_at: DateTime<Utc>,
    is_read: bool,
}

impl From<MailListRow> for MailSummary {
    fn from(r: MailListRow) -> Self {
        Self {
            id: r.id,
            sender: display_label(&r.sender_first_name, &r.sender_last_name, &r.sender_username),
            recipient: display_label(
                &r.recipient_first_name,
                &r.recipient_last_name,
                &r.recipient_username,
            ),
            project_id: r.project_id,
            project_name: r.project_name,
            subject: r.subject,
            sent_at: r.sent_at,
            is_read: r.is_read,
        }
    }
}

/// Which side of a mail the mailbox owner is on. The search filter matches
/// the counterpart's name fields: the sender for an inbox, the recipient for
/// a sent box.
#[derive(Debug, Clone, Copy)]
enum Side {
    Recipient,
    Sender,
}

impl Side {
    fn owner_column(self) -> &'static str {
        match self {
            Side::Recipient => "m.recipient_id",
            Side::Sender => "m.sender_id",
        }
    }

    fn counterpart_alias(self) -> &'static str {
        match self {
            Side::Recipient => "s",
            Side::Sender => "r",
        }
    }
}

const MAIL_COLUMNS: &str = "id, sender_id, recipient_id, project_id, subject, body, sent_at, is_read";

pub struct MailRepository;

impl MailRepository {
    pub async fn insert(
        exec: impl PgExecutor<'_>,
        sender_id: i64,
        recipient_id: i64,
        project_id: i64,
        subject: &str,
        body: &str,
    ) -> Result<Mail, sqlx::Error> {
        let row = sqlx::query_as::<_, MailRow>(&format!(
            r#"
            INSERT INTO mails (sender_id, recipient_id, project_id, subject, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MAIL_COLUMNS}
            "#
        ))
        .bind(sender_id)
        .bind(recipient_id)
        .bind(project_id)
        .bind(subject)
        .bind(body)
        .fetch_one(exec)
        .await?;

        Ok(row.into())
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Mail>, sqlx::Error> {
        let row =
            sqlx::query_as::<_, MailRow>(&format!("SELECT {MAIL_COLUMNS} FROM mails WHERE id = $1"))
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Flip the read flag, recipient-side only. The `is_read = FALSE` guard
    /// makes the transition monotonic: once read, never unread.
    pub async fn mark_read(pool: &PgPool, mail_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE mails SET is_read = TRUE WHERE id = $1 AND is_read = FALSE")
            .bind(mail_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn page_inbox(
        pool: &PgPool,
        owner_id: i64,
        project_filter: Option<i64>,
        search_pattern: Option<&str>,
        requested_page: Option<i64>,
    ) -> Result<Page<MailSummary>, sqlx::Error> {
        Self::page_mailbox(
            pool,
            Side::Recipient,
            owner_id,
            project_filter,
            search_pattern,
            requested_page,
        )
        .await
    }

    pub async fn page_sent(
        pool: &PgPool,
        owner_id: i64,
        project_filter: Option<i64>,
        search_pattern: Option<&str>,
        requested_page: Option<i64>,
    ) -> Result<Page<MailSummary>, sqlx::Error> {
        Self::page_mailbox(
            pool,
            Side::Sender,
            owner_id,
            project_filter,
            search_pattern,
            requested_page,
        )
        .await
    }

    async fn page_mailbox(
        pool: &PgPool,
        side: Side,
        owner_id: i64,
        project_filter: Option<i64>,
        search_pattern: Option<&str>,
        requested_page: Option<i64>,
    ) -> Result<Page<MailSummary>, sqlx::Error> {
        let owner = side.owner_column();
        let cp = side.counterpart_alias();

        let where_clause = format!(
            r#"
            {owner} = $1
            AND ($2::bigint IS NULL OR m.project_id = $2)
            AND ($3::text IS NULL
                 OR m.subject ILIKE $3
                 OR m.body ILIKE $3
                 OR {cp}.username ILIKE $3
                 OR {cp}.first_name ILIKE $3
                 OR {cp}.last_name ILIKE $3)
            "#
        );

        let total: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*)
            FROM mails m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.recipient_id
            WHERE {where_clause}
            "#
        ))
        .bind(owner_id)
        .bind(project_filter)
        .bind(search_pattern)
        .fetch_one(pool)
        .await?;

        let page = clamp_page(requested_page, total);

        let rows = sqlx::query_as::<_, MailListRow>(&format!(
            r#"
            SELECT
                m.id,
                s.username   AS sender_username,
                s.first_name AS sender_first_name,
                s.last_name  AS sender_last_name,
                r.username   AS recipient_username,
                r.first_name AS recipient_first_name,
                r.last_name  AS recipient_last_name,
                m.project_id,
                p.name AS project_name,
                m.subject,
                m.sent_at,
                m.is_read
            FROM mails m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.recipient_id
            JOIN projects p ON p.id = m.project_id
            WHERE {where_clause}
            ORDER BY m.sent_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(owner_id)
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
