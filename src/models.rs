//! Core model types shared across repositories, services and the API layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Projection of the external identity store. Credentials live elsewhere;
/// this service only consumes a stable id and the name fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// Display label used wherever a user is offered for selection:
    /// `First Last (username)`, or the bare username when both name
    /// fields are blank.
    pub fn display_name(&self) -> String {
        display_label(&self.first_name, &self.last_name, &self.username)
    }
}

/// See [`User::display_name`]; usable on joined rows without building a
/// full `User`.
pub fn display_label(first_name: &str, last_name: &str, username: &str) -> String {
    let full = format!("{first_name} {last_name}").trim().to_string();
    if full.is_empty() {
        username.to_string()
    } else {
        format!("{full} ({username})")
    }
}

/// A workspace whose membership gates who may message whom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// A sent message. Immutable once created except for `is_read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mail {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub project_id: i64,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Mail as listed in a mailbox: ids resolved to display labels for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct MailSummary {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub project_id: i64,
    pub project_name: String,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

/// A mutable, author-owned, not-yet-sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: i64,
    pub author_id: i64,
    pub project_id: i64,
    pub recipient_id: Option<i64>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Draft as listed in the drafts mailbox.
#[derive(Debug, Clone, Serialize)]
pub struct DraftSummary {
    pub id: i64,
    pub project_id: i64,
    pub project_name: String,
    pub recipient: Option<String>,
    pub subject: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, first: &str, last: &str) -> User {
        User {
            id: 1,
            username: username.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: String::new(),
        }
    }

    #[test]
    fn display_name_with_full_name() {
        assert_eq!(user("ada", "Ada", "Lovelace").display_name(), "Ada Lovelace (ada)");
    }

    #[test]
    fn display_name_first_only() {
        assert_eq!(user("ada", "Ada", "").display_name(), "Ada (ada)");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(user("ada", "", "").display_name(), "ada");
    }
}
