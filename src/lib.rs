//! projmail: intranet project-scoped mail.
//!
//! Users join projects; project membership gates who may message whom. Mail
//! is immutable once sent (read flag aside); drafts are author-owned and
//! promote atomically into mail. An optional AI assistant prefills drafts
//! from a free-text prompt.

pub mod accounts;
pub mod ai;
pub mod api;
pub mod compose;
pub mod config;
pub mod db;
pub mod error;
pub mod mailbox;
pub mod models;
pub mod pagination;
