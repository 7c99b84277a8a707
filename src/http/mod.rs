//! HTTP client module
//!
//! The single request path used by every backend operation.
//!
//! # Features
//!
//! - **Bearer Authentication**: Token read from the caller's `Credentials`
//! - **Status Classification**: 401 vs other failures, as a pure function
//! - **Diagnostics**: Unreachable backends name the URL that was tried

mod client;

pub use client::{classify, classify_failure, HttpClient, RequestConfig};
