//! Developer helpers for poking the bridge's delivery channels.
//!
//! `webhook-test` and `email-test` talk to the providers directly using
//! the same env vars as the server; `verify` posts a sample submission
//! to a running server instance.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use discord::types::Embed;
use discord::WebhookClient;
use resend::{ResendOptions, ResendService};

#[derive(Parser)]
#[command(name = "dev")]
#[command(about = "Developer helpers for the YouTube membership bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a test embed through the configured Discord webhook
    WebhookTest,

    /// Send a test email through Resend
    EmailTest {
        /// Recipient address
        #[arg(long)]
        to: String,
    },

    /// Post a sample submission to a running bridge server
    Verify {
        /// Verify endpoint to hit
        #[arg(long, default_value = "http://localhost:3000/verify")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::WebhookTest => cmd_webhook_test().await,
        Commands::EmailTest { to } => cmd_email_test(&to).await,
        Commands::Verify { url } => cmd_verify(&url).await,
    }
}

async fn cmd_webhook_test() -> Result<()> {
    let url = std::env::var("DISCORD_WEBHOOK_URL").context("DISCORD_WEBHOOK_URL not set")?;
    let webhook = WebhookClient::new(url);

    println!("{}", "Sending test embed...".bright_yellow());
    let embed = Embed::new()
        .title("Webhook Working!")
        .description("Test message from the dev CLI.")
        .color(0xFF5A1F)
        .timestamp_now();
    webhook.send_embed(embed).await?;

    println!("{}", "Webhook message sent - check the channel".bright_green());
    Ok(())
}

async fn cmd_email_test(to: &str) -> Result<()> {
    let api_key = std::env::var("RESEND_API_KEY").context("RESEND_API_KEY not set")?;
    let from = std::env::var("EMAIL_FROM")
        .unwrap_or_else(|_| "Jesse ON FIRE <noreply@jesseonfire.com>".to_string());
    let resend = ResendService::new(ResendOptions { api_key, from });

    println!("{}", format!("Sending test email to {}...", to).bright_yellow());
    let response = resend
        .send_email(
            to,
            "Bridge email test",
            "<p>Test message from the dev CLI.</p>",
        )
        .await?;

    println!("{}", format!("Email accepted (id {})", response.id).bright_green());
    Ok(())
}

async fn cmd_verify(url: &str) -> Result<()> {
    let payload = serde_json::json!({
        "youtubeHandle": "@TestInnerCircle",
        "chatHandle": "testinner#1234",
        "email": "test.inner@example.com",
    });

    println!("{}", format!("POST {}", url).bright_yellow());
    let response = reqwest::Client::new()
        .post(url)
        .json(&payload)
        .send()
        .await
        .context("request failed - is the server running?")?;

    let status = response.status();
    let body: serde_json::Value = response.json().await.context("response was not JSON")?;

    if status.is_success() {
        println!("{} {}", "Status:".bright_green(), status);
    } else {
        println!("{} {}", "Status:".bright_red(), status);
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
