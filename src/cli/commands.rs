//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// reply-desk: triage Gmail and send AI-drafted replies from the terminal
#[derive(Parser, Debug)]
#[command(name = "reply-desk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (defaults to $REPLY_DESK_API_URL or http://localhost:8000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Token file (defaults to $REPLY_DESK_TOKEN_FILE or .reply-desk/token.json)
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start Google sign-in and print the authorization URL
    Login,

    /// Finish Google sign-in with the code and state from the redirect
    Callback {
        /// Authorization code
        #[arg(long)]
        code: String,

        /// Anti-forgery state returned by `login`
        #[arg(long)]
        state: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show who the stored session token belongs to
    Whoami,

    /// Work with ingested emails
    Emails {
        #[command(subcommand)]
        command: EmailCommands,
    },

    /// Work with reply drafts
    Drafts {
        #[command(subcommand)]
        command: DraftCommands,
    },

    /// Serve the web UI behind the route gate
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Directory containing the built UI
        #[arg(long, default_value = "frontend/dist")]
        dir: PathBuf,
    },
}

/// `emails` subcommands
#[derive(Subcommand, Debug)]
pub enum EmailCommands {
    /// List ingested emails
    List,

    /// Show one email with its body
    Get {
        /// Email id
        id: i64,
    },

    /// Ingest all unread messages from Gmail
    FetchUnread,

    /// Ingest one message by Gmail id
    Fetch {
        /// Gmail message id
        gmail_id: String,
    },
}

/// `drafts` subcommands
#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// List drafts
    List,

    /// Show one draft
    Get {
        /// Draft id
        id: i64,
    },

    /// Generate a reply draft for an email
    Generate {
        /// Email id to reply to
        email_id: i64,

        /// Tone hint (e.g. friendly, formal)
        #[arg(long)]
        tone: Option<String>,
    },

    /// Replace a draft's content
    Update {
        /// Draft id
        id: i64,

        /// New content
        #[arg(long)]
        content: String,
    },

    /// Approve a draft for sending
    Approve {
        /// Draft id
        id: i64,
    },

    /// Send an approved draft
    Send {
        /// Draft id
        id: i64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}
