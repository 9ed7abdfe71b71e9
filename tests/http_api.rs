//! HTTP-level integration tests for the mail service.
//!
//! These prove the deployed contract: membership-gated sending, the
//! draft/send state machine, read-flag monotonicity and the lenient mailbox
//! filters.
//!
//! Requires a running PostgreSQL database with migrations applied.
//! Run with: DATABASE_URL="postgresql:///projmail_test" cargo test --test http_api -- --ignored --nocapture

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use projmail::api::{build_router, AppState};

// ── Test app builder ───────────────────────────────────────────

async fn build_test_app() -> Router {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to test database");

    build_router(AppState::new(pool, None))
}

/// Unique suffix so reruns against a persistent database never collide.
fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

fn json_request(method: &str, uri: &str, user_id: Option<i64>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, user_id: i64) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .body(Body::empty())
        .unwrap()
}

async fn response_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user who creates a brand-new project; returns (user_id, project_id).
async fn register_with_new_project(app: &Router, username: &str, project: &str) -> (i64, i64) {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            None,
            json!({
                "username": username,
                "first_name": "Test",
                "last_name": "User",
                "project_choice": "new",
                "new_project_name": project,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    (
        body["user"]["id"].as_i64().unwrap(),
        body["project"]["id"].as_i64().unwrap(),
    )
}

/// Register a user who joins an existing project.
async fn register_joining(app: &Router, username: &str, project_id: i64) -> i64 {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            None,
            json!({
                "username": username,
                "project_choice": "existing",
                "existing_project": project_id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    response_json(resp).await["user"]["id"].as_i64().unwrap()
}

async fn inbox_total(app: &Router, user_id: i64, query: &str) -> i64 {
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/inbox{query}"), user_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    response_json(resp).await["page"]["total_items"].as_i64().unwrap()
}

// ── Tests ──────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn send_requires_recipient_membership() {
    let app = build_test_app().await;

    let (alice, alpha) =
        register_with_new_project(&app, &unique("alice"), &unique("Alpha")).await;
    let bob = register_joining(&app, &unique("bob"), alpha).await;
    // Carol is in her own project, not Alpha.
    let (carol, _) = register_with_new_project(&app, &unique("carol"), &unique("Gamma")).await;

    // Member recipient: mail goes through, unread.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/compose",
            Some(alice),
            json!({
                "action": "send",
                "project": alpha,
                "recipient": bob,
                "subject": "Hello",
                "body": "First message",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let mail_id = response_json(resp).await["mail_id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(get_request(&format!("/mail/{mail_id}"), bob))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Non-member recipient: rejected, nothing persisted.
    let carol_before = inbox_total(&app, carol, "").await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/compose",
            Some(alice),
            json!({
                "action": "send",
                "project": alpha,
                "recipient": carol,
                "subject": "Sneaky",
                "body": "Should not arrive",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = response_json(resp).await;
    assert!(body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["field"] == "recipient"));
    assert_eq!(inbox_total(&app, carol, "").await, carol_before);
}

#[tokio::test]
#[ignore]
async fn send_validates_all_fields_at_once() {
    let app = build_test_app().await;
    let (alice, _) = register_with_new_project(&app, &unique("alice"), &unique("Alpha")).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/compose",
            Some(alice),
            json!({ "action": "send", "subject": "", "body": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let fields: Vec<String> = response_json(resp).await["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect();
    for expected in ["project", "recipient", "subject", "body"] {
        assert!(fields.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
#[ignore]
async fn incomplete_draft_cannot_be_sent() {
    let app = build_test_app().await;
    let (alice, alpha) =
        register_with_new_project(&app, &unique("alice"), &unique("Alpha")).await;

    // Draft with a project but no recipient; empty subject/body are fine.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/compose",
            Some(alice),
            json!({ "action": "draft", "project": alpha, "subject": "Hi" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let draft_id = response_json(resp).await["draft_id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/drafts/edit/{draft_id}"),
            Some(alice),
            json!({ "action": "send" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Draft unchanged afterwards.
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/drafts/edit/{draft_id}"), alice))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    assert_eq!(body["draft"]["subject"], "Hi");
    assert!(body["draft"]["recipient_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn draft_promotion_is_atomic() {
    let app = build_test_app().await;
    let (alice, alpha) =
        register_with_new_project(&app, &unique("alice"), &unique("Alpha")).await;
    let bob = register_joining(&app, &unique("bob"), alpha).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/compose",
            Some(alice),
            json!({
                "action": "draft",
                "project": alpha,
                "recipient": bob,
                "subject": "Draft subject",
                "body": "Draft body",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let draft_id = response_json(resp).await["draft_id"].as_i64().unwrap();

    let bob_before = inbox_total(&app, bob, "").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/drafts/edit/{draft_id}"),
            Some(alice),
            json!({ "action": "send" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Exactly one new mail exists and the draft is gone.
    assert_eq!(inbox_total(&app, bob, "").await, bob_before + 1);
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/drafts/edit/{draft_id}"), alice))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn read_flag_is_recipient_only_and_monotonic() {
    let app = build_test_app().await;
    let (alice, alpha) =
        register_with_new_project(&app, &unique("alice"), &unique("Alpha")).await;
    let bob = register_joining(&app, &unique("bob"), alpha).await;
    let (mallory, _) =
        register_with_new_project(&app, &unique("mallory"), &unique("Mu")).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/compose",
            Some(alice),
            json!({
                "action": "send",
                "project": alpha,
                "recipient": bob,
                "subject": "Read me",
                "body": "Please",
            }),
        ))
        .await
        .unwrap();
    let mail_id = response_json(resp).await["mail_id"].as_i64().unwrap();

    // Sender view does not flip the flag.
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/mail/{mail_id}"), alice))
        .await
        .unwrap();
    assert_eq!(response_json(resp).await["mail"]["is_read"], false);

    // Recipient view flips it.
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/mail/{mail_id}"), bob))
        .await
        .unwrap();
    assert_eq!(response_json(resp).await["mail"]["is_read"], true);

    // And it stays flipped.
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/mail/{mail_id}"), alice))
        .await
        .unwrap();
    assert_eq!(response_json(resp).await["mail"]["is_read"], true);

    // Strangers get nothing.
    let resp = app
        .clone()
        .oneshot(get_request(&format!("/mail/{mail_id}"), mallory))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn none_filters_and_page_clamping() {
    let app = build_test_app().await;
    let (alice, alpha) =
        register_with_new_project(&app, &unique("alice"), &unique("Alpha")).await;
    let bob = register_joining(&app, &unique("bob"), alpha).await;

    for i in 0..3 {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/compose",
                Some(alice),
                json!({
                    "action": "send",
                    "project": alpha,
                    "recipient": bob,
                    "subject": format!("Mail {i}"),
                    "body": "Body",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let unfiltered = inbox_total(&app, bob, "").await;
    assert_eq!(unfiltered, 3);

    // "none" (any case), empty and garbage project filters are no-ops.
    for query in ["?project=none", "?project=NONE", "?project=", "?project=abc"] {
        assert_eq!(inbox_total(&app, bob, query).await, unfiltered, "{query}");
    }
    // Search "none" is a no-op too.
    assert_eq!(inbox_total(&app, bob, "?search=none").await, unfiltered);
    // A real search narrows.
    assert_eq!(inbox_total(&app, bob, "?search=Mail%201").await, 1);

    // Out-of-range page clamps to the last page instead of erroring.
    let resp = app
        .clone()
        .oneshot(get_request("/inbox?page=999", bob))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = response_json(resp).await;
    assert_eq!(body["page"]["page"], body["page"]["total_pages"]);
}

#[tokio::test]
#[ignore]
async fn missing_identity_is_unauthorized() {
    let app = build_test_app().await;
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/inbox").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
