//! Mailbox Query Service: filtered, searchable, paginated views over mail
//! and drafts. Pure reads.
//!
//! Filter handling is lenient: the literal text "none" (any case), empty
//! strings and garbage numbers all mean "no filter", never an error.

use sqlx::PgPool;

use crate::db::{like_pattern, DraftRepository, MailRepository};
use crate::error::AppError;
use crate::models::{DraftSummary, MailSummary};
use crate::pagination::Page;

/// Raw query-string filters as they arrive from the client.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct MailboxParams {
    pub project: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

/// Empty, "none" (any case) or non-integer project values disable the filter.
pub fn parse_project_filter(raw: Option<&str>) -> Option<i64> {
    let v = raw?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("none") {
        return None;
    }
    v.parse().ok()
}

/// Empty or "none" (any case) search text disables the search.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    let v = raw?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(v.to_string())
}

/// Page numbers are clamped later against the result size; here anything
/// unparseable just means "first page".
pub fn parse_page(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

#[derive(Clone)]
pub struct MailboxQuery {
    pool: PgPool,
}

impl MailboxQuery {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn inbox(
        &self,
        owner_id: i64,
        params: &MailboxParams,
    ) -> Result<Page<MailSummary>, AppError> {
        let (project, search, page) = normalize(params);
        let page = MailRepository::page_inbox(
            &self.pool,
            owner_id,
            project,
            search.as_deref(),
            page,
        )
        .await?;
        Ok(page)
    }

    pub async fn sent(
        &self,
        owner_id: i64,
        params: &MailboxParams,
    ) -> Result<Page<MailSummary>, AppError> {
        let (project, search, page) = normalize(params);
        let page =
            MailRepository::page_sent(&self.pool, owner_id, project, search.as_deref(), page)
                .await?;
        Ok(page)
    }

    pub async fn drafts(
        &self,
        owner_id: i64,
        params: &MailboxParams,
    ) -> Result<Page<DraftSummary>, AppError> {
        let (project, search, page) = normalize(params);
        let page = DraftRepository::page_drafts(
            &self.pool,
            owner_id,
            project,
            search.as_deref(),
            page,
        )
        .await?;
        Ok(page)
    }
}

fn normalize(params: &MailboxParams) -> (Option<i64>, Option<String>, Option<i64>) {
    (
        parse_project_filter(params.project.as_deref()),
        normalize_search(params.search.as_deref()).map(|s| like_pattern(&s)),
        parse_page(params.page.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_filter_none_literal_any_case() {
        assert_eq!(parse_project_filter(Some("none")), None);
        assert_eq!(parse_project_filter(Some("NONE")), None);
        assert_eq!(parse_project_filter(Some("None")), None);
    }

    #[test]
    fn project_filter_empty_and_garbage() {
        assert_eq!(parse_project_filter(None), None);
        assert_eq!(parse_project_filter(Some("")), None);
        assert_eq!(parse_project_filter(Some("  ")), None);
        assert_eq!(parse_project_filter(Some("abc")), None);
    }

    #[test]
    fn project_filter_parses_ids() {
        assert_eq!(parse_project_filter(Some("42")), Some(42));
        assert_eq!(parse_project_filter(Some(" 7 ")), Some(7));
    }

    #[test]
    fn search_none_literal_disables() {
        assert_eq!(normalize_search(Some("none")), None);
        assert_eq!(normalize_search(Some("NoNe")), None);
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(Some("  ")), None);
    }

    #[test]
    fn search_keeps_real_text() {
        assert_eq!(normalize_search(Some(" meeting ")), Some("meeting".into()));
        // "nonexistent" must not be mistaken for the literal "none"
        assert_eq!(
            normalize_search(Some("nonexistent")),
            Some("nonexistent".into())
        );
    }

    #[test]
    fn page_parsing_is_lenient() {
        assert_eq!(parse_page(Some("3")), Some(3));
        assert_eq!(parse_page(Some("abc")), None);
        assert_eq!(parse_page(None), None);
    }
}
