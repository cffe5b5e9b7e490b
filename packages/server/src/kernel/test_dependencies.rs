// TestDependencies - mock implementations for testing
//
// Provides recording mocks that can be injected into ServerDeps or the
// grant reactor for tests. Each mock records the calls it receives and can
// be primed to fail.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use discord::Embed;

use crate::kernel::{BaseAuditSink, BaseDiscordService, BaseMailer, ServerDeps};

// =============================================================================
// Mock Mailer
// =============================================================================

/// Arguments captured from a send call
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every subsequent send fail with the given reason.
    pub fn failing_with(self, reason: &str) -> Self {
        *self.failure.lock().unwrap() = Some(reason.to_string());
        self
    }

    /// Get all emails that were sent
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!("{}", reason));
        }

        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Audit Sink
// =============================================================================

pub struct MockAuditSink {
    embeds: Arc<Mutex<Vec<Embed>>>,
    contents: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self {
            embeds: Arc::new(Mutex::new(Vec::new())),
            contents: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every subsequent post fail with the given reason.
    pub fn failing_with(self, reason: &str) -> Self {
        *self.failure.lock().unwrap() = Some(reason.to_string());
        self
    }

    /// Get all embeds that were posted
    pub fn embeds(&self) -> Vec<Embed> {
        self.embeds.lock().unwrap().clone()
    }

    /// Get all plain-text messages that were posted
    pub fn contents(&self) -> Vec<String> {
        self.contents.lock().unwrap().clone()
    }

    pub fn embed_count(&self) -> usize {
        self.embeds.lock().unwrap().len()
    }
}

impl Default for MockAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAuditSink for MockAuditSink {
    async fn post_embed(&self, embed: Embed) -> Result<()> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!("{}", reason));
        }

        self.embeds.lock().unwrap().push(embed);
        Ok(())
    }

    async fn post_content(&self, content: &str) -> Result<()> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!("{}", reason));
        }

        self.contents.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

// =============================================================================
// Mock Discord Service (bot-side)
// =============================================================================

/// Arguments captured from an add_role call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub guild_id: String,
    pub user_id: String,
    pub role_id: String,
}

pub struct MockDiscordService {
    channel_embeds: Arc<Mutex<Vec<(String, Embed)>>>,
    role_grants: Arc<Mutex<Vec<RoleGrant>>>,
    dms: Arc<Mutex<Vec<(String, Embed)>>>,
    replies: Arc<Mutex<Vec<String>>>,
    role_failure: Arc<Mutex<Option<String>>>,
    dm_failure: Arc<Mutex<Option<String>>>,
}

impl MockDiscordService {
    pub fn new() -> Self {
        Self {
            channel_embeds: Arc::new(Mutex::new(Vec::new())),
            role_grants: Arc::new(Mutex::new(Vec::new())),
            dms: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(Vec::new())),
            role_failure: Arc::new(Mutex::new(None)),
            dm_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every subsequent role grant fail with the given reason.
    pub fn failing_roles_with(self, reason: &str) -> Self {
        *self.role_failure.lock().unwrap() = Some(reason.to_string());
        self
    }

    /// Make every subsequent DM fail (user has DMs closed).
    pub fn with_closed_dms(self) -> Self {
        *self.dm_failure.lock().unwrap() = Some("cannot send messages to this user".to_string());
        self
    }

    /// Get all (channel_id, embed) pairs that were posted
    pub fn channel_embeds(&self) -> Vec<(String, Embed)> {
        self.channel_embeds.lock().unwrap().clone()
    }

    /// Get embeds posted to a specific channel
    pub fn embeds_in(&self, channel_id: &str) -> Vec<Embed> {
        self.channel_embeds
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == channel_id)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Get all role grants that were performed
    pub fn role_grants(&self) -> Vec<RoleGrant> {
        self.role_grants.lock().unwrap().clone()
    }

    /// Get all (user_id, embed) DMs that were sent
    pub fn dms(&self) -> Vec<(String, Embed)> {
        self.dms.lock().unwrap().clone()
    }

    /// Get all ephemeral interaction replies
    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }
}

impl Default for MockDiscordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDiscordService for MockDiscordService {
    async fn post_embed(&self, channel_id: &str, embed: Embed) -> Result<()> {
        self.channel_embeds
            .lock()
            .unwrap()
            .push((channel_id.to_string(), embed));
        Ok(())
    }

    async fn add_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<()> {
        if let Some(reason) = self.role_failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!("{}", reason));
        }

        self.role_grants.lock().unwrap().push(RoleGrant {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        });
        Ok(())
    }

    async fn dm_embed(&self, user_id: &str, embed: Embed) -> Result<()> {
        if let Some(reason) = self.dm_failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!("{}", reason));
        }

        self.dms.lock().unwrap().push((user_id.to_string(), embed));
        Ok(())
    }

    async fn reply_ephemeral(
        &self,
        _interaction_id: &str,
        _interaction_token: &str,
        content: &str,
    ) -> Result<()> {
        self.replies.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks plus a ServerDeps wired to them, for endpoint tests.
pub struct TestDependencies {
    pub mailer: Arc<MockMailer>,
    pub audit: Arc<MockAuditSink>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            mailer: Arc::new(MockMailer::new()),
            audit: Arc::new(MockAuditSink::new()),
        }
    }

    /// Mocks primed so that both delivery channels fail.
    pub fn failing_with(mailer_reason: &str, audit_reason: &str) -> Self {
        Self {
            mailer: Arc::new(MockMailer::new().failing_with(mailer_reason)),
            audit: Arc::new(MockAuditSink::new().failing_with(audit_reason)),
        }
    }

    /// Mocks with a working mailer but a broken audit channel.
    pub fn failing_audit_with(reason: &str) -> Self {
        Self {
            mailer: Arc::new(MockMailer::new()),
            audit: Arc::new(MockAuditSink::new().failing_with(reason)),
        }
    }

    /// ServerDeps with both channels configured and pointed at the mocks.
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps {
            mailer: Some(self.mailer.clone()),
            audit: Some(self.audit.clone()),
            invite_url: "https://discord.gg/test-invite".to_string(),
            webhook_preview: Some("https://discord.com/api/webhooks/1234...".to_string()),
            youtube_channel_id: "UCtest".to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// ServerDeps with the primary email channel disabled.
    pub fn server_deps_without_mailer(&self) -> ServerDeps {
        ServerDeps {
            mailer: None,
            ..self.server_deps()
        }
    }

    /// ServerDeps with no delivery channel configured at all.
    pub fn server_deps_unconfigured(&self) -> ServerDeps {
        ServerDeps {
            mailer: None,
            audit: None,
            webhook_preview: None,
            ..self.server_deps()
        }
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
