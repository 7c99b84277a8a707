//! Data shapes exchanged with the backend
//!
//! These mirror the backend's JSON exactly and carry no behavior beyond a
//! few read-only helpers.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Emails
// ============================================================================

/// Summary view of an ingested email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: i64,
    pub gmail_id: String,
    pub thread_id: Option<String>,
    pub user_email: Option<String>,
    pub sender: Option<String>,
    pub to_recipients: Option<String>,
    pub subject: Option<String>,
    pub snippet: Option<String>,
    /// Whether a body was captured (absent in some listings)
    #[serde(default)]
    pub has_body: bool,
    pub fetched_at: String,
}

impl Email {
    /// `fetched_at` as a date-time, when it parses
    pub fn fetched_at_datetime(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.fetched_at)
    }
}

/// Full view of an email, including bodies and labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDetail {
    #[serde(flatten)]
    pub email: Email,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl std::ops::Deref for EmailDetail {
    type Target = Email;

    fn deref(&self) -> &Email {
        &self.email
    }
}

// ============================================================================
// Drafts
// ============================================================================

/// A generated reply draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: i64,
    /// Email this draft replies to
    pub email_id: i64,
    pub content: Option<String>,
    pub tone: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
}

impl Draft {
    /// Approved and waiting to be sent
    pub fn is_approved(&self) -> bool {
        self.status.as_deref() == Some("approved")
    }

    /// Already delivered through Gmail
    pub fn is_sent(&self) -> bool {
        self.status.as_deref() == Some("sent")
    }

    /// `created_at` as a date-time, when it parses
    pub fn created_at_datetime(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

/// Body of `POST /drafts/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateDraftRequest {
    pub email_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

/// Body of `PATCH /drafts/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateDraftRequest {
    pub content: String,
}

// ============================================================================
// Response Envelopes
// ============================================================================

/// Start of the Google OAuth flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStart {
    /// Where to send the user's browser
    pub auth_url: String,
    /// Anti-forgery state to hand back on callback
    pub state: String,
}

/// Result of a completed OAuth callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCallback {
    /// Session token for subsequent requests
    pub jwt: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchUnread {
    pub fetched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOne {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDraft {
    pub draft_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftUpdated {
    pub updated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftApproved {
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSent {
    pub sent: bool,
    /// Message id Gmail assigned to the sent reply
    pub sent_gmail_id: String,
}

/// Parse a backend timestamp: RFC 3339, or naive ISO 8601 with either separator
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
