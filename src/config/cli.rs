use clap::Parser;
use std::path::PathBuf;

/// 在本機執行 consultation handler 的參數
#[derive(Debug, Clone, Parser)]
#[command(name = "send-consultation")]
#[command(about = "Run the consultation request handler locally against a single event")]
pub struct CliArgs {
    /// API gateway event JSON file; reads stdin when neither --event nor --body is given
    #[arg(long, short, conflicts_with = "body")]
    pub event: Option<PathBuf>,

    /// Raw request body, sent as a POST event
    #[arg(long, short)]
    pub body: Option<String>,

    /// Override the HTTP method of the event
    #[arg(long, short)]
    pub method: Option<String>,

    /// TOML mail configuration; falls back to SMTP_* environment variables
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log the composed email instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Request identifier reported back in the response
    #[arg(long)]
    pub request_id: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn request_id(&self) -> String {
        self.request_id
            .clone()
            .unwrap_or_else(|| format!("local-{}", chrono::Utc::now().timestamp_millis()))
    }
}
