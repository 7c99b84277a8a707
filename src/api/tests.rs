//! Tests for the backend API module

use super::*;
use crate::auth::{Credentials, MemoryTokenStore, RecordingNavigator, ResetSession};
use crate::http::HttpClient;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer, credentials: Credentials) -> ApiClient {
    ApiClient::new(HttpClient::new(server.uri()).unwrap(), credentials)
}

fn email_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "gmail_id": format!("18c{id}"),
        "thread_id": format!("t{id}"),
        "user_email": "me@example.com",
        "sender": "client@example.com",
        "to_recipients": "me@example.com",
        "subject": "Quote request",
        "snippet": "Could you send",
        "has_body": true,
        "fetched_at": "2024-03-01T12:30:00.123456"
    })
}

fn draft_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email_id": 42,
        "content": "Thanks for reaching out",
        "tone": "friendly",
        "status": status,
        "created_at": "2024-03-01T12:31:00"
    })
}

// ============================================================================
// Auth Endpoints
// ============================================================================

#[tokio::test]
async fn test_start_google_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/google/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth_url": "https://accounts.google.com/o/oauth2/v2/auth?state=s1",
            "state": "s1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::anonymous());
    let start = api.start_google_auth().await.unwrap();

    assert_eq!(start.state, "s1");
    assert!(start.auth_url.starts_with("https://accounts.google.com"));
}

#[tokio::test]
async fn test_google_callback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/google/callback"))
        .and(query_param("code", "c0de"))
        .and(query_param("state", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jwt": "header.payload.sig",
            "email": "me@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::anonymous());
    let callback = api.google_callback("c0de", "s1").await.unwrap();

    assert_eq!(
        callback,
        AuthCallback {
            jwt: "header.payload.sig".into(),
            email: "me@example.com".into(),
        }
    );
}

// ============================================================================
// Email Endpoints
// ============================================================================

#[tokio::test]
async fn test_list_emails_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emails"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([email_json(1), email_json(2)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::anonymous());
    let emails = api.list_emails().await.unwrap();

    assert_eq!(emails.len(), 2);
    assert_eq!(emails[0].gmail_id, "18c1");
    assert_eq!(emails[1].subject.as_deref(), Some("Quote request"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/emails");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_get_email_detail() {
    let server = MockServer::start().await;

    let mut body = email_json(7);
    body["body_text"] = json!("Could you send a quote?");
    body["body_html"] = json!(null);
    body["labels"] = json!(["INBOX"]);

    Mock::given(method("GET"))
        .and(path("/emails/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    let detail = api.get_email(7).await.unwrap();

    assert_eq!(detail.id, 7);
    assert_eq!(detail.body_text.as_deref(), Some("Could you send a quote?"));
    assert_eq!(detail.body_html, None);
    assert_eq!(detail.labels, Some(vec!["INBOX".to_string()]));
}

#[tokio::test]
async fn test_fetch_unread() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/internal/fetch-unread"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fetched": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    assert!(api.fetch_unread().await.unwrap().fetched);
}

#[tokio::test]
async fn test_fetch_single_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/internal/fetch/18cafe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    assert!(api.fetch_email("18cafe").await.unwrap().ok);
}

// ============================================================================
// Draft Endpoints
// ============================================================================

#[tokio::test]
async fn test_list_drafts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drafts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            draft_json(2, "approved"),
            draft_json(1, "pending")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    let drafts = api.list_drafts().await.unwrap();

    assert_eq!(drafts.len(), 2);
    assert!(drafts[0].is_approved());
    assert!(!drafts[1].is_approved());
}

#[tokio::test]
async fn test_generate_draft_with_tone() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/drafts/generate"))
        .and(header("authorization", "Bearer abc"))
        .and(body_string(r#"{"email_id":42,"tone":"friendly"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "draft_id": 11,
            "content": "Hi! Thanks for your message."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    let generated = api.generate_draft(42, Some("friendly")).await.unwrap();

    assert_eq!(generated.draft_id, 11);
    assert_eq!(generated.content, "Hi! Thanks for your message.");
}

#[tokio::test]
async fn test_generate_draft_without_tone_omits_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/drafts/generate"))
        .and(body_json(json!({"email_id": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "draft_id": 12,
            "content": "Hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    api.generate_draft(5, None).await.unwrap();
}

#[tokio::test]
async fn test_get_draft() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drafts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(draft_json(3, "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    let draft = api.get_draft(3).await.unwrap();

    assert_eq!(draft.id, 3);
    assert_eq!(draft.email_id, 42);
    assert_eq!(draft.tone.as_deref(), Some("friendly"));
}

#[tokio::test]
async fn test_update_draft() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/drafts/3"))
        .and(body_string(r#"{"content":"Edited reply"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    assert!(api.update_draft(3, "Edited reply").await.unwrap().updated);
}

#[tokio::test]
async fn test_approve_and_send_draft() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/drafts/3/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"approved": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/drafts/3/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sent": true,
            "sent_gmail_id": "18d0beef"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    assert!(api.approve_draft(3).await.unwrap().approved);

    let sent = api.send_draft(3).await.unwrap();
    assert!(sent.sent);
    assert_eq!(sent.sent_gmail_id, "18d0beef");
}

#[tokio::test]
async fn test_send_unapproved_draft_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/drafts/4/send"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Draft must be approved before sending"),
        )
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("abc"));
    let err = api.send_draft(4).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "API error: 400 Draft must be approved before sending"
    );
    // Not a 401, so the token survives
    assert_eq!(
        api.credentials().token().await.unwrap(),
        Some("abc".to_string())
    );
}

// ============================================================================
// Unauthorized Handling
// ============================================================================

#[tokio::test]
async fn test_unauthorized_clears_token_and_navigates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drafts/7"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid or expired token"))
        .expect(1)
        .mount(&server)
        .await;

    let navigator = Arc::new(RecordingNavigator::new());
    let creds = Credentials::new(MemoryTokenStore::with_token("abc"));
    let api = api_for(&server, creds.clone())
        .with_unauthorized_handler(ResetSession::new(navigator.clone()));

    let err = api.get_draft(7).await.unwrap_err();

    assert_eq!(err.to_string(), "Unauthorized");
    assert_eq!(creds.token().await.unwrap(), None);
    assert_eq!(navigator.visited(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_unauthorized_without_handler_keeps_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let creds = Credentials::with_token("abc");
    let api = api_for(&server, creds.clone()).without_unauthorized_handler();

    assert!(api.list_emails().await.unwrap_err().is_unauthorized());
    assert_eq!(creds.token().await.unwrap(), Some("abc".to_string()));
}

#[tokio::test]
async fn test_other_errors_do_not_trigger_handler() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drafts/8"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Draft not found"))
        .mount(&server)
        .await;

    let navigator = Arc::new(RecordingNavigator::new());
    let api = api_for(&server, Credentials::with_token("abc"))
        .with_unauthorized_handler(ResetSession::new(navigator.clone()));

    let err = api.get_draft(8).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(navigator.visited().is_empty());
}

#[tokio::test]
async fn test_with_credentials_switches_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drafts"))
        .and(header("authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, Credentials::with_token("first"))
        .with_credentials(Credentials::with_token("second"));

    assert!(api.list_drafts().await.unwrap().is_empty());
}
