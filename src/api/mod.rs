//! Backend API module
//!
//! Typed wrappers for every endpoint the UI consumes: Google sign-in,
//! email listing and ingestion, and the draft lifecycle
//! (generate → edit → approve → send).

mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    parse_timestamp, AuthCallback, AuthStart, Draft, DraftApproved, DraftSent, DraftUpdated,
    Email, EmailDetail, FetchOne, FetchUnread, GenerateDraftRequest, GeneratedDraft,
    UpdateDraftRequest,
};

#[cfg(test)]
mod tests;
