//! webhook-test - send a test notification through the configured delivery path
//!
//! Loads the channel health configuration (YAML file or environment), then
//! delivers one notification exactly as the gateway would.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use litellm_channel_health::utils::logging::init_logging;
use litellm_channel_health::{Config, Notify, WebhookSender};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "webhook-test", version, about = "Send a test webhook notification")]
struct Cli {
    /// YAML configuration file; environment variables are used when omitted
    #[arg(short, long, env = "CHANNEL_HEALTH_CONFIG")]
    config: Option<String>,

    /// Destination webhook; defaults to `webhook.notify_url`
    #[arg(short, long)]
    url: Option<String>,

    /// Signing secret; defaults to `webhook.notify_secret`
    #[arg(short, long)]
    secret: Option<String>,

    /// Notification type
    #[arg(long = "type", default_value = "test")]
    notify_type: String,

    #[arg(long, default_value = "Webhook test")]
    title: String,

    /// Content template
    #[arg(long, default_value = "This is a test notification sent at %s")]
    content: String,

    /// Placeholder value as JSON (repeatable); bare words are sent as strings
    #[arg(long = "value")]
    values: Vec<String>,
}

fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    // The subscriber depends on the loaded config, so loading itself is not logged.
    if let Err(e) = init_logging(config.logging()) {
        eprintln!("Warning: {}", e);
    }
    info!(
        source = cli.config.as_deref().unwrap_or("environment"),
        "Configuration loaded"
    );

    let url = cli
        .url
        .or_else(|| config.webhook().notify_url.clone())
        .context("no destination: pass --url or set webhook.notify_url")?;
    let secret = cli.secret.or_else(|| config.webhook().notify_secret.clone());

    let values = if cli.values.is_empty() && cli.content.contains('%') {
        vec![serde_json::Value::String(
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        )]
    } else {
        cli.values.iter().map(|v| parse_value(v)).collect()
    };
    let notify = Notify::new(cli.notify_type, cli.title, cli.content).with_values(values);

    let sender = WebhookSender::from_config(&config, reqwest::Client::new())?;
    info!(mode = sender.mode(), url = %url, "Sending test notification");
    sender.send(&url, secret.as_deref(), &notify).await?;
    info!("Test notification delivered");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
