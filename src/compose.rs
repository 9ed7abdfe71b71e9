//! Compose/Draft Engine: the state machine over Composing, Draft, Sent and
//! Discarded.
//!
//! Recipient eligibility is always recomputed from the project id submitted
//! with the request, not from any previously rendered state. A mail row is
//! only ever written after the full validation pass succeeds.

use sqlx::PgPool;

use crate::db::{DraftRepository, MailRepository, MembershipResolver};
use crate::error::{AppError, FieldError};
use crate::models::{Draft, Mail};

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// One compose submission. `project`/`recipient` unset when the form fields
/// were left empty.
#[derive(Debug, Clone, Default)]
pub struct ComposeInput {
    pub project: Option<i64>,
    pub recipient: Option<i64>,
    pub subject: String,
    pub body: String,
}

#[derive(Clone)]
pub struct ComposeEngine {
    pool: PgPool,
}

impl ComposeEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Direct send, no intermediate draft. Requires a project the sender
    /// belongs to, an eligible recipient within that project, and non-empty
    /// subject and body. All failures are reported together; nothing is
    /// persisted unless every check passes.
    pub async fn send(&self, sender_id: i64, input: &ComposeInput) -> Result<Mail, AppError> {
        let mut errors = Vec::new();

        let project_id = self.validated_project(sender_id, input.project, &mut errors).await?;

        match input.recipient {
            None => errors.push(FieldError::new("recipient", REQUIRED)),
            Some(recipient_id) => {
                let eligible = match project_id {
                    Some(pid) => self.is_eligible(pid, sender_id, recipient_id).await?,
                    // Without a valid project there is no recipient set to
                    // choose from.
                    None => false,
                };
                if !eligible {
                    errors.push(FieldError::new("recipient", INVALID_CHOICE));
                }
            }
        }

        if input.subject.trim().is_empty() {
            errors.push(FieldError::new("subject", REQUIRED));
        }
        if input.body.trim().is_empty() {
            errors.push(FieldError::new("body", REQUIRED));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let mail = MailRepository::insert(
            &self.pool,
            sender_id,
            input.recipient.unwrap_or_default(),
            project_id.unwrap_or_default(),
            input.subject.trim(),
            &input.body,
        )
        .await?;

        Ok(mail)
    }

    /// Save a new draft. Project is required and must be one of the
    /// author's; recipient, subject and body may all be left empty, but a
    /// recipient that IS given must be eligible for the submitted project.
    pub async fn save_draft(&self, author_id: i64, input: &ComposeInput) -> Result<Draft, AppError> {
        let project_id = self.validate_draft_fields(author_id, input).await?;

        let draft = DraftRepository::insert(
            &self.pool,
            author_id,
            project_id,
            input.recipient,
            &input.subject,
            &input.body,
        )
        .await?;

        Ok(draft)
    }

    /// Edit an existing draft. Same field rules as [`save_draft`];
    /// `updated_at` is refreshed on every successful call.
    ///
    /// [`save_draft`]: ComposeEngine::save_draft
    pub async fn update_draft(
        &self,
        author_id: i64,
        draft_id: i64,
        input: &ComposeInput,
    ) -> Result<Draft, AppError> {
        self.owned_draft(author_id, draft_id).await?;
        let project_id = self.validate_draft_fields(author_id, input).await?;

        let draft = DraftRepository::update(
            &self.pool,
            draft_id,
            project_id,
            input.recipient,
            &input.subject,
            &input.body,
        )
        .await?;

        Ok(draft)
    }

    /// Promote a draft to a sent mail. Fails with `IncompleteDraft` when the
    /// recipient (or project) is unset, leaving the draft untouched;
    /// otherwise the insert-mail/delete-draft pair runs in one transaction.
    pub async fn send_draft(&self, author_id: i64, draft_id: i64) -> Result<Mail, AppError> {
        let draft = self.owned_draft(author_id, draft_id).await?;

        let recipient_id = draft.recipient_id.ok_or(AppError::IncompleteDraft)?;

        let mail = DraftRepository::promote(&self.pool, &draft, recipient_id).await?;
        Ok(mail)
    }

    /// Delete a draft. No validation beyond ownership.
    pub async fn discard_draft(&self, author_id: i64, draft_id: i64) -> Result<(), AppError> {
        self.owned_draft(author_id, draft_id).await?;
        DraftRepository::delete(&self.pool, draft_id).await?;
        Ok(())
    }

    pub async fn draft_for_edit(&self, author_id: i64, draft_id: i64) -> Result<Draft, AppError> {
        self.owned_draft(author_id, draft_id).await
    }

    // ------------------------------------------------------------------

    async fn owned_draft(&self, author_id: i64, draft_id: i64) -> Result<Draft, AppError> {
        let draft = DraftRepository::get(&self.pool, draft_id)
            .await?
            .ok_or(AppError::NotFound("draft"))?;
        if draft.author_id != author_id {
            return Err(AppError::Permission("not the author of this draft"));
        }
        Ok(draft)
    }

    /// Shared draft-path validation: required project owned by the author,
    /// optional but eligible recipient.
    async fn validate_draft_fields(
        &self,
        author_id: i64,
        input: &ComposeInput,
    ) -> Result<i64, AppError> {
        let mut errors = Vec::new();

        let project_id = self.validated_project(author_id, input.project, &mut errors).await?;

        if let Some(recipient_id) = input.recipient {
            let eligible = match project_id {
                Some(pid) => self.is_eligible(pid, author_id, recipient_id).await?,
                None => false,
            };
            if !eligible {
                errors.push(FieldError::new("recipient", INVALID_CHOICE));
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(project_id.unwrap_or_default())
    }

    /// The submitted project must exist in the actor's own membership list.
    async fn validated_project(
        &self,
        actor_id: i64,
        project: Option<i64>,
        errors: &mut Vec<FieldError>,
    ) -> Result<Option<i64>, AppError> {
        match project {
            None => {
                errors.push(FieldError::new("project", REQUIRED));
                Ok(None)
            }
            Some(pid) => {
                if MembershipResolver::is_member(&self.pool, actor_id, pid).await? {
                    Ok(Some(pid))
                } else {
                    errors.push(FieldError::new("project", INVALID_CHOICE));
                    Ok(None)
                }
            }
        }
    }

    /// Request-scoped eligibility: the recipient must appear in the member
    /// set of the submitted project, minus the actor. Derived fresh per
    /// call, never memoized.
    async fn is_eligible(
        &self,
        project_id: i64,
        actor_id: i64,
        recipient_id: i64,
    ) -> Result<bool, AppError> {
        let recipients =
            MembershipResolver::eligible_recipients(&self.pool, project_id, actor_id).await?;
        Ok(recipients.iter().any(|u| u.id == recipient_id))
    }
}
