//! Event handlers for the bot process.
//!
//! One reactor instance owns the pending-grant registry and a per-member
//! role cache, and is driven by a single gateway event stream. Handlers
//! run to completion one at a time, so the registry needs no locking.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{error, info, warn};

use discord::gateway::GatewayEvent;
use discord::types::{Embed, GuildMember, Interaction, Message};

use crate::config::BotConfig;
use crate::domains::verification::audit::{AuditEvent, AUDIT_COLOR};
use crate::domains::verification::Tier;
use crate::kernel::BaseDiscordService;

use super::models::{mint_code, GrantKey, PendingGrant};
use super::registry::PendingGrants;

const VERIFIED_COLOR: u32 = 0x00FF00;

pub struct Reactor {
    config: BotConfig,
    chat: Arc<dyn BaseDiscordService>,
    registry: PendingGrants,
    /// Last seen role set per member id, for diffing role updates
    member_roles: HashMap<String, HashSet<String>>,
}

impl Reactor {
    pub fn new(config: BotConfig, chat: Arc<dyn BaseDiscordService>) -> Self {
        Self {
            config,
            chat,
            registry: PendingGrants::new(),
            member_roles: HashMap::new(),
        }
    }

    pub fn pending_grants(&self) -> usize {
        self.registry.len()
    }

    pub async fn handle(&mut self, event: GatewayEvent) {
        match event {
            GatewayEvent::Ready { user, .. } => {
                info!(user = %user.tag(), "bridge bot online");
                info!(channel = %self.config.watch_channel_id, "monitoring audit channel");
            }
            GatewayEvent::MessageCreate(message) => self.on_message(message).await,
            GatewayEvent::GuildMemberAdd(member) => self.on_member_add(member).await,
            GatewayEvent::GuildMemberUpdate(member) => self.on_member_update(member).await,
            GatewayEvent::InteractionCreate(interaction) => {
                self.on_interaction(interaction).await
            }
        }
    }

    /// A message landed in the audit channel. If it parses as a
    /// verification event, file a pending grant and post a status reply
    /// telling the submitter what happens next.
    async fn on_message(&mut self, message: Message) {
        if message.channel_id != self.config.watch_channel_id {
            return;
        }
        let Some(event) = message.embeds.first().and_then(AuditEvent::from_embed) else {
            return;
        };
        let AuditEvent::Submission {
            youtube_handle,
            discord_handle,
            email,
            tier,
            ..
        } = event;

        info!(youtube = %youtube_handle, "new verification submission observed");

        let target_role = tier.unwrap_or_default().role_id(&self.config.roles);
        let status = match discord_handle {
            Some(ref handle) => {
                let key = GrantKey::handle(handle);
                let displaced = self.registry.put(PendingGrant::new(
                    key,
                    youtube_handle.clone(),
                    target_role,
                    tier,
                ));
                if let Some(old) = displaced {
                    info!(handle = %handle, old_source = %old.source_handle,
                        "newer submission displaced a pending grant");
                }
                self.handle_status_embed(&youtube_handle, handle, &email)
            }
            None => {
                let code = mint_code();
                self.registry.put(PendingGrant::new(
                    GrantKey::code(&code),
                    youtube_handle.clone(),
                    target_role,
                    tier,
                ));
                info!(code = %code, "issued one-time code for submission without handle");
                self.code_status_embed(&youtube_handle, &email, &code)
            }
        };

        if let Err(err) = self
            .chat
            .post_embed(&self.config.watch_channel_id, status)
            .await
        {
            warn!(error = %err, "failed to post verification status");
        }
    }

    fn handle_status_embed(&self, youtube: &str, handle: &str, email: &str) -> Embed {
        Embed::new()
            .title("Verification Status")
            .color(AUDIT_COLOR)
            .description(format!("Submission from **{}**", youtube))
            .field("Discord Username", handle, true)
            .field("Email", email, true)
            .field("Status", "Awaiting server join", false)
            .field(
                "Required Actions",
                "1. Join the Discord server via the invite link\n\
                 2. Connect YouTube under User Settings > Connections\n\
                 3. Discord verifies membership within 2-3 minutes\n\
                 4. Role assigned automatically based on tier",
                false,
            )
            .field("Invite Link", &self.config.invite_url, false)
            .timestamp_now()
    }

    fn code_status_embed(&self, youtube: &str, email: &str, code: &str) -> Embed {
        Embed::new()
            .title("Verification Status")
            .color(AUDIT_COLOR)
            .description(format!("Submission from **{}**", youtube))
            .field("Email", email, true)
            .field("Status", "Awaiting code entry", false)
            .field("One-Time Code", code, true)
            .field(
                "Redeem",
                format!("Join the server, then run /verify code:{}", code),
                false,
            )
            .field("Invite Link", &self.config.invite_url, false)
            .timestamp_now()
    }

    /// A member joined. If their handle matches a pending grant, resolve
    /// it: assign the recorded tier role, announce in the audit channel,
    /// and try to DM them.
    async fn on_member_add(&mut self, member: GuildMember) {
        let Some(user) = member.user.clone() else {
            return;
        };
        self.member_roles
            .insert(user.id.clone(), member.roles.iter().cloned().collect());

        let Some(grant) = self.registry.take(&GrantKey::handle(&user.tag())) else {
            return;
        };

        let guild_id = member
            .guild_id
            .clone()
            .unwrap_or_else(|| self.config.guild_id.clone());
        if let Err(err) = self
            .chat
            .add_role(&guild_id, &user.id, &grant.target_role_id)
            .await
        {
            error!(user = %user.tag(), role = %grant.target_role_id, error = %err,
                "role grant failed on member join");
            return;
        }

        info!(user = %user.tag(), source = %grant.source_handle, "member verified on join");

        let announcement = Embed::new()
            .title("Member Verified")
            .color(VERIFIED_COLOR)
            .description(format!(
                "**{}** matched a pending verification from **{}**",
                user.tag(),
                grant.source_handle
            ))
            .field("User", format!("<@{}>", user.id), true)
            .field("Role", format!("<@&{}>", grant.target_role_id), true)
            .field("Source", &grant.source_handle, true)
            .timestamp_now();
        if let Err(err) = self
            .chat
            .post_embed(&self.config.watch_channel_id, announcement)
            .await
        {
            warn!(error = %err, "failed to announce member verification");
        }

        self.send_welcome_dm(&user.id, &user.tag()).await;
    }

    /// A member's roles changed. If Discord's own YouTube integration
    /// just handed them a tier role, announce it. The first sighting of
    /// a member only seeds the cache; there is nothing to diff against.
    async fn on_member_update(&mut self, member: GuildMember) {
        let Some(user) = member.user.clone() else {
            return;
        };
        let current: HashSet<String> = member.roles.iter().cloned().collect();
        let Some(previous) = self.member_roles.insert(user.id.clone(), current.clone()) else {
            return;
        };

        let tier_roles = self.config.roles.all();
        let added: Vec<&String> = current
            .difference(&previous)
            .filter(|role| tier_roles.contains(&role.as_str()))
            .collect();
        if added.is_empty() {
            return;
        }

        info!(user = %user.tag(), "member auto-verified by YouTube integration");

        let roles = added
            .iter()
            .map(|role| format!("<@&{}>", role))
            .collect::<Vec<_>>()
            .join(", ");
        let announcement = Embed::new()
            .title("YouTube Member Verified")
            .color(VERIFIED_COLOR)
            .description(format!(
                "**{}** has been verified as a YouTube member",
                user.tag()
            ))
            .field(
                "Status",
                "Discord successfully verified YouTube membership",
                false,
            )
            .field("User", format!("<@{}>", user.id), true)
            .field("Roles Assigned", roles, true)
            .footer_text("Auto-verified by Discord YouTube integration")
            .timestamp_now();
        if let Err(err) = self
            .chat
            .post_embed(&self.config.watch_channel_id, announcement)
            .await
        {
            warn!(error = %err, "failed to announce auto-verification");
        }

        self.send_welcome_dm(&user.id, &user.tag()).await;
    }

    /// `/verify code:<code>` redeems a one-time code for the default
    /// member role. The code is consumed before the role call, so a
    /// failed grant leaves it spent; the reply tells the member to ask
    /// a moderator rather than to retry.
    async fn on_interaction(&mut self, interaction: Interaction) {
        if interaction.command_name() != Some("verify") {
            return;
        }
        let Some(user) = interaction.invoker().cloned() else {
            return;
        };

        let Some(code) = interaction.string_option("code") else {
            self.reply(&interaction, "Usage: /verify code:YT-XXXX").await;
            return;
        };

        let Some(grant) = self.registry.take(&GrantKey::code(code)) else {
            info!(code = %code, user = %user.tag(), "unrecognized verification code");
            self.reply(
                &interaction,
                "That code was not recognized. Submit the verification form again to get a new one.",
            )
            .await;
            return;
        };

        let guild_id = interaction
            .guild_id
            .clone()
            .unwrap_or_else(|| self.config.guild_id.clone());
        let role_id = Tier::default().role_id(&self.config.roles);
        if let Err(err) = self.chat.add_role(&guild_id, &user.id, role_id).await {
            error!(user = %user.tag(), role = %role_id, error = %err,
                "role grant failed on code redemption");
            self.reply(
                &interaction,
                "Your code was accepted but the role assignment failed. Please contact a moderator.",
            )
            .await;
            return;
        }

        info!(user = %user.tag(), source = %grant.source_handle, "code redeemed");

        self.reply(
            &interaction,
            "You are verified! Your member role has been assigned.",
        )
        .await;

        let announcement = Embed::new()
            .title("Member Verified")
            .color(VERIFIED_COLOR)
            .description(format!("**{}** redeemed a verification code", user.tag()))
            .field("User", format!("<@{}>", user.id), true)
            .field("Role", format!("<@&{}>", role_id), true)
            .field("Source", &grant.source_handle, true)
            .timestamp_now();
        if let Err(err) = self
            .chat
            .post_embed(&self.config.watch_channel_id, announcement)
            .await
        {
            warn!(error = %err, "failed to announce code redemption");
        }
    }

    async fn reply(&self, interaction: &Interaction, content: &str) {
        if let Err(err) = self
            .chat
            .reply_ephemeral(&interaction.id, &interaction.token, content)
            .await
        {
            warn!(error = %err, "failed to reply to interaction");
        }
    }

    async fn send_welcome_dm(&self, user_id: &str, tag: &str) {
        let welcome = Embed::new()
            .title("Welcome to the Jesse ON FIRE Discord!")
            .color(AUDIT_COLOR)
            .description("Your YouTube membership has been verified!")
            .field("Access Granted", "You now have full member access!", false)
            .field("Channel", "Check out member-only channels!", false);
        if let Err(err) = self.chat.dm_embed(user_id, welcome).await {
            info!(user = %tag, error = %err, "could not DM member (DMs might be closed)");
        }
    }
}
