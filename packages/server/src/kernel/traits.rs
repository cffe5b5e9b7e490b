// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "deliver with fallback") lives in domain functions
// that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMailer, BaseAuditSink)

use anyhow::Result;
use async_trait::async_trait;
use discord::Embed;

// =============================================================================
// Mailer Trait (Infrastructure - primary email channel)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send one transactional email. Errors carry the provider's reason and
    /// are converted to result values at the delivery boundary, never
    /// propagated to HTTP callers.
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

// =============================================================================
// Audit Sink Trait (Infrastructure - webhook channel)
// =============================================================================

#[async_trait]
pub trait BaseAuditSink: Send + Sync {
    /// Post a structured embed to the audit channel.
    async fn post_embed(&self, embed: Embed) -> Result<()>;

    /// Post a plain-text message to the audit channel (manual-processing
    /// fallback path).
    async fn post_content(&self, content: &str) -> Result<()>;
}

// =============================================================================
// Discord Service Trait (Infrastructure - bot-side REST surface)
// =============================================================================

#[async_trait]
pub trait BaseDiscordService: Send + Sync {
    /// Post an embed to a channel.
    async fn post_embed(&self, channel_id: &str, embed: Embed) -> Result<()>;

    /// Grant a role to a guild member.
    async fn add_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<()>;

    /// Send an embed to a user's DMs. Fails when DMs are closed; callers
    /// treat that as non-fatal.
    async fn dm_embed(&self, user_id: &str, embed: Embed) -> Result<()>;

    /// Reply to an interaction with an ephemeral text message.
    async fn reply_ephemeral(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        content: &str,
    ) -> Result<()>;
}
