use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default sender for access emails.
pub const DEFAULT_EMAIL_FROM: &str = "Jesse ON FIRE <noreply@jesseonfire.com>";

/// Default server invite included in access emails and status replies.
pub const DEFAULT_INVITE_URL: &str = "https://discord.gg/9WpPC5GS";

/// Default channel id the RSS proxy resolves feeds for.
pub const DEFAULT_YOUTUBE_CHANNEL_ID: &str = "UCL1ULuUKdktFDpe66_A3H2A";

/// HTTP server configuration loaded from environment variables.
///
/// Optional credentials silently disable their channel: no `RESEND_API_KEY`
/// means no primary email sends, no `DISCORD_WEBHOOK_URL` means no audit
/// posts (and no fallback delivery).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub discord_webhook_url: Option<String>,
    pub discord_invite_url: String,
    pub youtube_channel_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            email_from: env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            discord_webhook_url: env::var("DISCORD_WEBHOOK_URL").ok(),
            discord_invite_url: env::var("DISCORD_INVITE_URL")
                .unwrap_or_else(|_| DEFAULT_INVITE_URL.to_string()),
            youtube_channel_id: env::var("YOUTUBE_CHANNEL_ID")
                .unwrap_or_else(|_| DEFAULT_YOUTUBE_CHANNEL_ID.to_string()),
        })
    }
}

/// Role ids granted per membership tier. Static configuration, never mutated
/// at runtime.
#[derive(Debug, Clone)]
pub struct TierRoles {
    pub inner_circle: String,
    pub best_friends: String,
    pub elite: String,
}

impl TierRoles {
    pub fn all(&self) -> [&str; 3] {
        [&self.inner_circle, &self.best_friends, &self.elite]
    }
}

/// Bot process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub application_id: String,
    pub guild_id: String,
    pub watch_channel_id: String,
    pub invite_url: String,
    pub roles: TierRoles,
}

impl BotConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            bot_token: env::var("DISCORD_BOT_TOKEN").context("DISCORD_BOT_TOKEN must be set")?,
            application_id: env::var("DISCORD_APP_ID").context("DISCORD_APP_ID must be set")?,
            guild_id: env::var("GUILD_ID").context("GUILD_ID must be set")?,
            watch_channel_id: env::var("WATCH_CHANNEL_ID")
                .unwrap_or_else(|_| "1433481744904093869".to_string()),
            invite_url: env::var("DISCORD_INVITE_URL")
                .unwrap_or_else(|_| DEFAULT_INVITE_URL.to_string()),
            roles: TierRoles {
                inner_circle: env::var("ROLE_INNER_CIRCLE")
                    .unwrap_or_else(|_| "1435138402474393812".to_string()),
                best_friends: env::var("ROLE_BEST_FRIENDS")
                    .unwrap_or_else(|_| "1435139067984482315".to_string()),
                elite: env::var("ROLE_ELITE")
                    .unwrap_or_else(|_| "1435139809214464051".to_string()),
            },
        })
    }
}
