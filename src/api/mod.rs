//! HTTP surface: application state, router construction and handlers.
//!
//! GET/POST /register              — account + initial project selection
//! GET      /inbox /sent /drafts   — paginated, filterable mailboxes
//! GET/POST /compose               — send or save draft
//! GET/POST /drafts/edit/:id       — edit / send / delete a draft
//! GET      /mail/:id              — view one mail, marking it read
//! GET      /api/project-users     — JSON recipient dropdown
//! POST     /api/generate-ai-draft — AI-assisted draft content
//! GET/POST /projects              — join/leave membership
//! POST     /projects/create       — create project

mod assistant;
mod auth;
mod compose;
mod drafts;
mod mail;
mod mailboxes;
mod project_users;
mod projects;
mod register;

pub use auth::CurrentUser;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::accounts::RegistrationService;
use crate::ai::DraftAssistant;
use crate::compose::ComposeEngine;
use crate::mailbox::MailboxQuery;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub engine: ComposeEngine,
    pub mailbox: MailboxQuery,
    pub registration: RegistrationService,
    pub assistant: Option<Arc<dyn DraftAssistant>>,
}

impl AppState {
    pub fn new(pool: PgPool, assistant: Option<Arc<dyn DraftAssistant>>) -> Self {
        Self {
            engine: ComposeEngine::new(pool.clone()),
            mailbox: MailboxQuery::new(pool.clone()),
            registration: RegistrationService::new(pool.clone()),
            pool,
            assistant,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/register", get(register::context).post(register::register))
        .route("/inbox", get(mailboxes::inbox))
        .route("/sent", get(mailboxes::sent))
        .route("/drafts", get(mailboxes::drafts))
        .route("/compose", get(compose::context).post(compose::submit))
        .route(
            "/drafts/edit/:draft_id",
            get(drafts::edit_context).post(drafts::edit_action),
        )
        .route("/mail/:mail_id", get(mail::read_mail))
        .route("/api/project-users", get(project_users::project_users))
        .route("/api/generate-ai-draft", post(assistant::generate_ai_draft))
        .route(
            "/projects",
            get(projects::context).post(projects::membership_action),
        )
        .route("/projects/create", post(projects::create))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
