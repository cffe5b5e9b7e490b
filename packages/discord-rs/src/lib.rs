//! Minimal Discord REST and gateway client.
//!
//! Covers the slice of the Discord API this project needs: channel messages,
//! role grants, DMs, webhooks, slash-command registration, and a gateway
//! connection that yields dispatch events over a channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use discord::{DiscordClient, DiscordOptions, CreateMessage};
//!
//! let client = DiscordClient::new(DiscordOptions {
//!     bot_token: std::env::var("DISCORD_BOT_TOKEN")?,
//! });
//!
//! client
//!     .create_message("123456789", &CreateMessage::text("hello"))
//!     .await?;
//! ```

pub mod error;
pub mod gateway;
pub mod types;

pub use error::{DiscordError, Result};
pub use gateway::{Gateway, GatewayEvent};
pub use types::*;

use reqwest::Client;
use tracing::warn;

const API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone)]
pub struct DiscordOptions {
    pub bot_token: String,
}

/// Bot-authenticated REST client.
#[derive(Clone)]
pub struct DiscordClient {
    options: DiscordOptions,
    http_client: Client,
}

impl DiscordClient {
    pub fn new(options: DiscordOptions) -> Self {
        Self {
            options,
            http_client: Client::new(),
        }
    }

    /// Create from environment variable `DISCORD_BOT_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| DiscordError::Config("DISCORD_BOT_TOKEN not set".into()))?;
        Ok(Self::new(DiscordOptions { bot_token }))
    }

    pub fn bot_token(&self) -> &str {
        &self.options.bot_token
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.options.bot_token)
    }

    /// Post a message to a channel.
    pub async fn create_message(
        &self,
        channel_id: &str,
        message: &CreateMessage,
    ) -> Result<Message> {
        let response = self
            .http_client
            .post(format!("{}/channels/{}/messages", API_BASE, channel_id))
            .header("Authorization", self.auth_header())
            .json(message)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, channel_id, "Discord message request failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Discord API error creating message");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Message>()
            .await
            .map_err(|e| DiscordError::Parse(e.to_string()))
    }

    /// Grant a role to a guild member. Discord returns 204 on success.
    pub async fn add_guild_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<()> {
        let response = self
            .http_client
            .put(format!(
                "{}/guilds/{}/members/{}/roles/{}",
                API_BASE, guild_id, user_id, role_id
            ))
            .header("Authorization", self.auth_header())
            .header("Content-Length", "0")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, role_id, "Discord role request failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, user_id, role_id, "Discord API error adding role");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Open (or fetch) a DM channel with a user.
    pub async fn create_dm(&self, user_id: &str) -> Result<Channel> {
        let response = self
            .http_client
            .post(format!("{}/users/@me/channels", API_BASE))
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "recipient_id": user_id }))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, "Discord DM channel request failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, user_id, "Discord API error opening DM");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Channel>()
            .await
            .map_err(|e| DiscordError::Parse(e.to_string()))
    }

    /// Open a DM channel and send a message in one call.
    ///
    /// Fails when the user has server DMs disabled, which callers should
    /// treat as non-fatal.
    pub async fn dm_user(&self, user_id: &str, message: &CreateMessage) -> Result<Message> {
        let channel = self.create_dm(user_id).await?;
        self.create_message(&channel.id, message).await
    }

    /// Acknowledge an interaction with a response.
    pub async fn create_interaction_response(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        interaction_response: &InteractionResponse,
    ) -> Result<()> {
        let response = self
            .http_client
            .post(format!(
                "{}/interactions/{}/{}/callback",
                API_BASE, interaction_id, interaction_token
            ))
            .header("Authorization", self.auth_header())
            .json(interaction_response)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Discord interaction callback failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Discord API error on interaction callback");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Overwrite the guild's slash commands with the given set.
    pub async fn set_guild_commands(
        &self,
        application_id: &str,
        guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> Result<()> {
        let response = self
            .http_client
            .put(format!(
                "{}/applications/{}/guilds/{}/commands",
                API_BASE, application_id, guild_id
            ))
            .header("Authorization", self.auth_header())
            .json(&commands)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, guild_id, "Discord command registration failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, guild_id, "Discord API error registering commands");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Fetch the websocket URL the bot should connect to.
    pub async fn get_gateway_url(&self) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct GatewayInfo {
            url: String,
        }

        let response = self
            .http_client
            .get(format!("{}/gateway/bot", API_BASE))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Discord gateway info request failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Discord API error fetching gateway URL");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let info: GatewayInfo = response
            .json()
            .await
            .map_err(|e| DiscordError::Parse(e.to_string()))?;

        Ok(info.url)
    }
}

/// Client for a single incoming webhook URL. No bot token required.
#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    http_client: Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute the webhook with an arbitrary payload.
    pub async fn execute(&self, payload: &WebhookPayload) -> Result<()> {
        let response = self
            .http_client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Discord webhook request failed");
                DiscordError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Discord webhook error");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Post a plain-text message through the webhook.
    pub async fn say(&self, content: impl Into<String>) -> Result<()> {
        self.execute(&WebhookPayload::text(content)).await
    }

    /// Post a single embed through the webhook.
    pub async fn send_embed(&self, embed: Embed) -> Result<()> {
        self.execute(&WebhookPayload::embed(embed)).await
    }
}
