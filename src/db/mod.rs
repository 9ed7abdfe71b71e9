//! Database access layer.
//!
//! Repositories are stateless structs whose methods take an executor, so the
//! same query can run against the pool or inside a transaction. All SQL is
//! runtime-bound; row types are private and converted into the public model
//! types via `From`.

mod drafts;
mod mails;
mod membership;
mod projects;
mod users;

pub use drafts::DraftRepository;
pub use mails::MailRepository;
pub use membership::MembershipResolver;
pub use projects::ProjectRepository;
pub use users::UserRepository;

/// True when the error is a Postgres unique-constraint violation, used to
/// turn duplicate usernames / project names into field-level validation
/// errors instead of 500s.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Escape LIKE/ILIKE metacharacters so user search text matches literally.
pub fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
