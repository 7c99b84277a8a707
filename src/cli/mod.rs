//! CLI module
//!
//! Command-line front end for the backend API.
//!
//! # Commands
//!
//! - `login` / `callback` / `logout` / `whoami` - Google sign-in and session
//! - `emails` - List, show and ingest emails
//! - `drafts` - Generate, edit, approve and send replies
//! - `serve` - Serve the web UI behind the route gate

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, DraftCommands, EmailCommands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, ServerConfig};
