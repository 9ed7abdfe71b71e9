//! Single-mail view. Readable by sender or recipient; flips the read flag
//! when the viewer is the recipient.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::db::MailRepository;
use crate::error::AppError;

use super::{AppState, CurrentUser};

pub async fn read_mail(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(mail_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut mail = MailRepository::get(&state.pool, mail_id)
        .await?
        .ok_or(AppError::NotFound("mail"))?;

    if mail.sender_id != user_id && mail.recipient_id != user_id {
        return Err(AppError::Permission(
            "You do not have permission to view this mail.",
        ));
    }

    // Recipient-only, false -> true only. Sender views never touch the flag.
    if mail.recipient_id == user_id && !mail.is_read {
        MailRepository::mark_read(&state.pool, mail.id).await?;
        mail.is_read = true;
    }

    Ok(Json(json!({ "mail": mail })))
}
