//! Server dependencies for handlers (using traits for testability)
//!
//! This module provides the central dependency container used by route
//! handlers and domain actions. External services sit behind trait
//! abstractions so tests can swap in recording mocks.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use discord::{CreateMessage, DiscordClient, Embed, InteractionResponse, WebhookClient};
use resend::ResendService;

use crate::config::Config;
use crate::kernel::{BaseAuditSink, BaseDiscordService, BaseMailer};

// =============================================================================
// ResendService Adapter (implements BaseMailer trait)
// =============================================================================

/// Wrapper around ResendService that implements the BaseMailer trait
pub struct ResendAdapter(pub Arc<ResendService>);

impl ResendAdapter {
    pub fn new(service: Arc<ResendService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseMailer for ResendAdapter {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        self.0
            .send_email(to, subject, html)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// WebhookClient Adapter (implements BaseAuditSink trait)
// =============================================================================

/// Wrapper around WebhookClient that implements the BaseAuditSink trait
pub struct WebhookAuditSink(pub WebhookClient);

impl WebhookAuditSink {
    pub fn new(client: WebhookClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseAuditSink for WebhookAuditSink {
    async fn post_embed(&self, embed: Embed) -> Result<()> {
        self.0
            .send_embed(embed)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn post_content(&self, content: &str) -> Result<()> {
        self.0.say(content).await.map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// DiscordClient Adapter (implements BaseDiscordService trait)
// =============================================================================

/// Wrapper around DiscordClient that implements the BaseDiscordService trait
pub struct DiscordAdapter(pub Arc<DiscordClient>);

impl DiscordAdapter {
    pub fn new(client: Arc<DiscordClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseDiscordService for DiscordAdapter {
    async fn post_embed(&self, channel_id: &str, embed: Embed) -> Result<()> {
        self.0
            .create_message(channel_id, &CreateMessage::embed(embed))
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn add_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<()> {
        self.0
            .add_guild_member_role(guild_id, user_id, role_id)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn dm_embed(&self, user_id: &str, embed: Embed) -> Result<()> {
        self.0
            .dm_user(user_id, &CreateMessage::embed(embed))
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn reply_ephemeral(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        content: &str,
    ) -> Result<()> {
        self.0
            .create_interaction_response(
                interaction_id,
                interaction_token,
                &InteractionResponse::ephemeral(content),
            )
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies accessible to route handlers and domain actions.
///
/// `mailer` and `audit` are `None` when the corresponding credential is
/// absent, which silently disables that channel.
#[derive(Clone)]
pub struct ServerDeps {
    pub mailer: Option<Arc<dyn BaseMailer>>,
    pub audit: Option<Arc<dyn BaseAuditSink>>,
    pub invite_url: String,
    /// Truncated webhook URL for the diagnostics endpoint. The full URL is
    /// never exposed.
    pub webhook_preview: Option<String>,
    pub youtube_channel_id: String,
    /// Shared client for the RSS proxy.
    pub http_client: reqwest::Client,
}

impl ServerDeps {
    /// Wire up real adapters from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mailer: Option<Arc<dyn BaseMailer>> = config.resend_api_key.as_ref().map(|key| {
            let service = ResendService::new(resend::ResendOptions {
                api_key: key.clone(),
                from: config.email_from.clone(),
            });
            Arc::new(ResendAdapter::new(Arc::new(service))) as Arc<dyn BaseMailer>
        });

        let audit: Option<Arc<dyn BaseAuditSink>> =
            config.discord_webhook_url.as_ref().map(|url| {
                Arc::new(WebhookAuditSink::new(WebhookClient::new(url.clone())))
                    as Arc<dyn BaseAuditSink>
            });

        Self {
            mailer,
            audit,
            invite_url: config.discord_invite_url.clone(),
            webhook_preview: config
                .discord_webhook_url
                .as_ref()
                .map(|url| preview_url(url)),
            youtube_channel_id: config.youtube_channel_id.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}

/// First 40 characters of a webhook URL, for diagnostics output.
pub fn preview_url(url: &str) -> String {
    let prefix: String = url.chars().take(40).collect();
    format!("{}...", prefix)
}
