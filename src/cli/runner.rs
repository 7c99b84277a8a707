//! CLI runner - executes commands

use crate::api::{parse_timestamp, ApiClient, Draft, Email, EmailDetail};
use crate::auth::TokenClaims;
use crate::cli::commands::{Cli, Commands, DraftCommands, EmailCommands, OutputFormat};
use crate::cli::server::{serve, ServerConfig};
use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Resolve configuration.
    ///
    /// With `--config` the YAML file is used, and fields it leaves out fall
    /// back to the environment. Without it the environment alone applies.
    /// `--api-url` and `--token-file` override either source.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_yaml_file(path)?,
            None => ClientConfig::from_env(),
        };

        if let Some(url) = &self.cli.api_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = &self.cli.token_file {
            config.token_path.clone_from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        if let Commands::Serve { port, dir } = &self.cli.command {
            let config = ServerConfig {
                static_dir: dir.clone(),
            };
            return serve(config, *port).await;
        }

        let config = self.client_config()?;
        debug!("Using backend at {}", config.base_url);
        let api = ApiClient::from_config(&config)?;

        match &self.cli.command {
            Commands::Login => self.login(&api).await,
            Commands::Callback { code, state } => self.callback(&api, code, state).await,
            Commands::Logout => {
                api.credentials().clear().await?;
                self.print_message("Signed out")
            }
            Commands::Whoami => self.whoami(&api).await,
            Commands::Emails { command } => self.emails(&api, command).await,
            Commands::Drafts { command } => self.drafts(&api, command).await,
            Commands::Serve { .. } => Ok(()),
        }
    }

    async fn login(&self, api: &ApiClient) -> Result<()> {
        let start = api.start_google_auth().await?;
        match self.cli.format {
            OutputFormat::Json => self.print_json(&start),
            OutputFormat::Pretty => {
                println!("Open this URL to sign in with Google:\n\n  {}\n", start.auth_url);
                println!("Then run: reply-desk callback --code <code> --state {}", start.state);
                Ok(())
            }
        }
    }

    async fn callback(&self, api: &ApiClient, code: &str, state: &str) -> Result<()> {
        let issued = api.google_callback(code, state).await?;
        api.credentials()
            .store_token(&issued.jwt)
            .await
            .context("Failed to save session")?;

        match self.cli.format {
            OutputFormat::Json => self.print_json(&json!({ "email": issued.email })),
            OutputFormat::Pretty => self.print_message(&format!("Signed in as {}", issued.email)),
        }
    }

    async fn whoami(&self, api: &ApiClient) -> Result<()> {
        let Some(token) = api.credentials().token().await? else {
            return self.print_message("Not signed in");
        };
        let claims = TokenClaims::decode_unverified(&token)?;

        match self.cli.format {
            OutputFormat::Json => self.print_json(&json!({
                "email": claims.sub,
                "expires_at": claims.expires_at().map(|t| t.to_rfc3339()),
                "expired": claims.is_expired(),
            })),
            OutputFormat::Pretty => {
                let expiry = claims.expires_at().map_or_else(
                    || "never".to_string(),
                    |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
                );
                let note = if claims.is_expired() { " (expired)" } else { "" };
                println!("{}\nexpires: {expiry}{note}", claims.sub);
                Ok(())
            }
        }
    }

    async fn emails(&self, api: &ApiClient, command: &EmailCommands) -> Result<()> {
        match command {
            EmailCommands::List => {
                let emails = api.list_emails().await?;
                match self.cli.format {
                    OutputFormat::Json => self.print_json(&emails),
                    OutputFormat::Pretty => {
                        emails.iter().for_each(|e| println!("{}", email_line(e)));
                        Ok(())
                    }
                }
            }
            EmailCommands::Get { id } => {
                let email = api.get_email(*id).await?;
                match self.cli.format {
                    OutputFormat::Json => self.print_json(&email),
                    OutputFormat::Pretty => {
                        println!("{}", email_detail_text(&email));
                        Ok(())
                    }
                }
            }
            EmailCommands::FetchUnread => {
                let result = api.fetch_unread().await?;
                self.print_outcome(&result, "Unread messages fetched")
            }
            EmailCommands::Fetch { gmail_id } => {
                let result = api.fetch_email(gmail_id).await?;
                self.print_outcome(&result, &format!("Fetched {gmail_id}"))
            }
        }
    }

    async fn drafts(&self, api: &ApiClient, command: &DraftCommands) -> Result<()> {
        match command {
            DraftCommands::List => {
                let drafts = api.list_drafts().await?;
                match self.cli.format {
                    OutputFormat::Json => self.print_json(&drafts),
                    OutputFormat::Pretty => {
                        drafts.iter().for_each(|d| println!("{}", draft_line(d)));
                        Ok(())
                    }
                }
            }
            DraftCommands::Get { id } => {
                let draft = api.get_draft(*id).await?;
                match self.cli.format {
                    OutputFormat::Json => self.print_json(&draft),
                    OutputFormat::Pretty => {
                        let content = draft.content.as_deref().unwrap_or("");
                        println!("{}\n\n{content}", draft_line(&draft));
                        Ok(())
                    }
                }
            }
            DraftCommands::Generate { email_id, tone } => {
                let generated = api.generate_draft(*email_id, tone.as_deref()).await?;
                match self.cli.format {
                    OutputFormat::Json => self.print_json(&generated),
                    OutputFormat::Pretty => {
                        println!("Draft #{}\n\n{}", generated.draft_id, generated.content);
                        Ok(())
                    }
                }
            }
            DraftCommands::Update { id, content } => {
                let result = api.update_draft(*id, content).await?;
                self.print_outcome(&result, &format!("Draft #{id} updated"))
            }
            DraftCommands::Approve { id } => {
                let result = api.approve_draft(*id).await?;
                self.print_outcome(&result, &format!("Draft #{id} approved"))
            }
            DraftCommands::Send { id } => {
                let sent = api.send_draft(*id).await?;
                match self.cli.format {
                    OutputFormat::Json => self.print_json(&sent),
                    OutputFormat::Pretty => self.print_message(&format!(
                        "Draft #{id} sent as Gmail message {}",
                        sent.sent_gmail_id
                    )),
                }
            }
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string(value)?);
        Ok(())
    }

    fn print_message(&self, message: &str) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.print_json(&json!({ "message": message })),
            OutputFormat::Pretty => {
                println!("{message}");
                Ok(())
            }
        }
    }

    fn print_outcome<T: Serialize>(&self, value: &T, message: &str) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.print_json(value),
            OutputFormat::Pretty => self.print_message(message),
        }
    }
}

fn short_timestamp(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || value.to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// One-line summary of an email
pub fn email_line(email: &Email) -> String {
    format!(
        "#{:<5} {}  {:<30}  {}",
        email.id,
        short_timestamp(&email.fetched_at),
        email.sender.as_deref().unwrap_or("(unknown sender)"),
        email.subject.as_deref().unwrap_or("(no subject)"),
    )
}

/// Full text rendering of an email
pub fn email_detail_text(email: &EmailDetail) -> String {
    let mut out = format!(
        "From:    {}\nTo:      {}\nSubject: {}\nDate:    {}\n",
        email.sender.as_deref().unwrap_or(""),
        email.to_recipients.as_deref().unwrap_or(""),
        email.subject.as_deref().unwrap_or(""),
        short_timestamp(&email.fetched_at),
    );
    if let Some(labels) = email.labels.as_ref().filter(|l| !l.is_empty()) {
        out.push_str(&format!("Labels:  {}\n", labels.join(", ")));
    }
    out.push('\n');
    out.push_str(
        email
            .body_text
            .as_deref()
            .or(email.snippet.as_deref())
            .unwrap_or(""),
    );
    out
}

/// One-line summary of a draft
pub fn draft_line(draft: &Draft) -> String {
    format!(
        "#{:<5} email #{:<5} {:<9} {:<10} {}",
        draft.id,
        draft.email_id,
        draft.status.as_deref().unwrap_or("pending"),
        draft.tone.as_deref().unwrap_or("-"),
        draft.created_at_datetime().map_or_else(
            || draft.created_at.clone(),
            |t| t.format("%Y-%m-%d %H:%M").to_string()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn sample_email() -> Email {
        Email {
            id: 3,
            gmail_id: "18c3".into(),
            thread_id: None,
            user_email: None,
            sender: Some("client@example.com".into()),
            to_recipients: Some("me@example.com".into()),
            subject: Some("Quote".into()),
            snippet: Some("Could you".into()),
            has_body: true,
            fetched_at: "2024-03-01T12:30:00.5".into(),
        }
    }

    #[test]
    fn test_email_line() {
        let line = email_line(&sample_email());
        assert!(line.starts_with("#3"));
        assert!(line.contains("2024-03-01 12:30"));
        assert!(line.contains("client@example.com"));
        assert!(line.ends_with("Quote"));
    }

    #[test]
    fn test_email_detail_falls_back_to_snippet() {
        let detail = EmailDetail {
            email: sample_email(),
            body_text: None,
            body_html: None,
            labels: Some(vec!["INBOX".into()]),
        };
        let text = email_detail_text(&detail);
        assert!(text.contains("Labels:  INBOX"));
        assert!(text.ends_with("Could you"));
    }

    #[test]
    fn test_draft_line_defaults() {
        let draft = Draft {
            id: 1,
            email_id: 3,
            content: None,
            tone: None,
            status: None,
            created_at: "not a date".into(),
        };
        let line = draft_line(&draft);
        assert!(line.contains("pending"));
        assert!(line.ends_with("not a date"));
    }

    #[test]
    fn test_draft_line_formats_created_at() {
        let draft = Draft {
            id: 2,
            email_id: 3,
            content: None,
            tone: Some("formal".into()),
            status: Some("approved".into()),
            created_at: "2024-03-01T12:31:00".into(),
        };
        let line = draft_line(&draft);
        assert!(line.contains("approved"));
        assert!(line.ends_with("2024-03-01 12:31"));
    }

    #[test]
    fn test_client_config_flags_override() {
        let cli = Cli::parse_from([
            "reply-desk",
            "--api-url",
            "http://backend:9000/",
            "--token-file",
            "/tmp/reply-desk-token.json",
            "logout",
        ]);
        let config = Runner::new(cli).client_config().unwrap();

        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(
            config.token_path,
            std::path::PathBuf::from("/tmp/reply-desk-token.json")
        );
    }

    #[tokio::test]
    async fn test_logout_recovers_from_corrupt_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{not json").unwrap();

        let cli = Cli::parse_from([
            "reply-desk",
            "--token-file",
            path.to_str().unwrap(),
            "logout",
        ]);
        Runner::new(cli).run().await.unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_client_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("reply-desk.yaml");
        std::fs::write(
            &config_path,
            "base_url: http://from-file:8000\nlogin_path: /signin\n",
        )
        .unwrap();
        let config_arg = config_path.to_str().unwrap();

        let cli = Cli::parse_from(["reply-desk", "-C", config_arg, "logout"]);
        let config = Runner::new(cli).client_config().unwrap();
        assert_eq!(config.base_url, "http://from-file:8000");
        assert_eq!(config.login_path, "/signin");

        let cli = Cli::parse_from([
            "reply-desk",
            "-C",
            config_arg,
            "--api-url",
            "http://from-flag:9000",
            "logout",
        ]);
        let config = Runner::new(cli).client_config().unwrap();
        assert_eq!(config.base_url, "http://from-flag:9000");
        assert_eq!(config.login_path, "/signin");
    }

    #[test]
    fn test_client_config_rejects_bad_url() {
        let cli = Cli::parse_from(["reply-desk", "--api-url", "localhost", "logout"]);
        assert!(Runner::new(cli).client_config().is_err());
    }
}
