use anyhow::Context;
use clap::Parser;
use relay_dispatcher::{relay, RawSharePayload};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Relay one article to the configured Telegram chat.
///
/// Needs TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID in the environment or a
/// `.env` file.
#[derive(Parser, Debug)]
#[command(name = "relay", version, about)]
struct Cli {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    url: Option<String>,

    #[arg(long)]
    source: Option<String>,

    #[arg(long)]
    summary: Option<String>,

    /// Read the payload from a JSON file instead of the flags
    #[arg(long, conflicts_with_all = ["title", "url", "source", "summary"])]
    json: Option<PathBuf>,
}

impl Cli {
    fn payload(self) -> anyhow::Result<RawSharePayload> {
        match self.json {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("Invalid payload in {}", path.display()))
            }
            None => Ok(RawSharePayload {
                title: self.title,
                url: self.url,
                source: self.source,
                summary: self.summary,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let payload = Cli::parse().payload()?;
    let outcome = relay(payload).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
