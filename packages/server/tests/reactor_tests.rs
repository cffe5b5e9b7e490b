//! Event-flow tests for the role-grant reactor.
//!
//! Gateway events are fed straight into the reactor; the Discord side
//! effects land in a recording mock.

use std::sync::Arc;

use serde_json::json;

use bridge_core::config::{BotConfig, TierRoles};
use bridge_core::domains::grants::Reactor;
use bridge_core::domains::verification::{AuditEvent, Tier};
use bridge_core::kernel::{MockDiscordService, RoleGrant};
use discord::gateway::GatewayEvent;
use discord::types::{GuildMember, Interaction, InteractionData, InteractionOption, Message, User};

const WATCH: &str = "watch-1";

fn test_config() -> BotConfig {
    BotConfig {
        bot_token: "test-token".to_string(),
        application_id: "app-1".to_string(),
        guild_id: "guild-1".to_string(),
        watch_channel_id: WATCH.to_string(),
        invite_url: "https://discord.gg/test-invite".to_string(),
        roles: TierRoles {
            inner_circle: "role-inner".to_string(),
            best_friends: "role-bff".to_string(),
            elite: "role-elite".to_string(),
        },
    }
}

fn user(id: &str, username: &str, discriminator: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        discriminator: discriminator.to_string(),
        global_name: None,
        bot: false,
    }
}

fn member(user: User, roles: &[&str]) -> GuildMember {
    GuildMember {
        user: Some(user),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        guild_id: Some("guild-1".to_string()),
        nick: None,
    }
}

fn audit_message(channel_id: &str, event: &AuditEvent) -> GatewayEvent {
    GatewayEvent::MessageCreate(Message {
        id: "m1".to_string(),
        channel_id: channel_id.to_string(),
        author: None,
        content: String::new(),
        embeds: vec![event.to_embed()],
        webhook_id: Some("wh-1".to_string()),
    })
}

fn submission(youtube: &str, discord_handle: Option<&str>, tier: Option<Tier>) -> AuditEvent {
    AuditEvent::submission(
        youtube,
        discord_handle.map(String::from),
        "test@example.com",
        "Sent via resend",
        tier,
    )
}

fn verify_interaction(invoker: User, code: Option<&str>) -> GatewayEvent {
    GatewayEvent::InteractionCreate(Interaction {
        id: "i1".to_string(),
        token: "tok-1".to_string(),
        guild_id: Some("guild-1".to_string()),
        channel_id: Some(WATCH.to_string()),
        data: Some(InteractionData {
            name: "verify".to_string(),
            options: code
                .map(|c| {
                    vec![InteractionOption {
                        name: "code".to_string(),
                        value: json!(c),
                    }]
                })
                .unwrap_or_default(),
        }),
        member: Some(member(invoker, &[])),
        user: None,
    })
}

#[tokio::test]
async fn join_resolves_a_pending_grant_exactly_once() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    // Mixed-case handle in the submission, lowercase tag on join
    reactor
        .handle(audit_message(
            WATCH,
            &submission("@TestUser", Some("TestInner#1234"), None),
        ))
        .await;
    assert_eq!(reactor.pending_grants(), 1);
    assert_eq!(chat.embeds_in(WATCH).len(), 1);

    reactor
        .handle(GatewayEvent::GuildMemberAdd(member(
            user("42", "testinner", "1234"),
            &[],
        )))
        .await;

    assert_eq!(
        chat.role_grants(),
        vec![RoleGrant {
            guild_id: "guild-1".to_string(),
            user_id: "42".to_string(),
            role_id: "role-inner".to_string(),
        }]
    );
    assert_eq!(reactor.pending_grants(), 0);
    assert_eq!(chat.dms().len(), 1);

    // A second identical join finds no entry and performs no grant
    reactor
        .handle(GatewayEvent::GuildMemberAdd(member(
            user("42", "testinner", "1234"),
            &[],
        )))
        .await;
    assert_eq!(chat.role_grants().len(), 1);
}

#[tokio::test]
async fn recorded_tier_drives_the_granted_role() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(audit_message(
            WATCH,
            &submission("@EliteFan", Some("elitefan#0007"), Some(Tier::Elite)),
        ))
        .await;
    reactor
        .handle(GatewayEvent::GuildMemberAdd(member(
            user("7", "elitefan", "0007"),
            &[],
        )))
        .await;

    assert_eq!(chat.role_grants()[0].role_id, "role-elite");
}

#[tokio::test]
async fn handleless_submission_issues_a_redeemable_code() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(audit_message(WATCH, &submission("@NewUser", None, None)))
        .await;

    let status = &chat.embeds_in(WATCH)[0];
    assert_eq!(status.field_value("Status"), Some("Awaiting code entry"));
    let code = status.field_value("One-Time Code").unwrap().to_string();
    assert!(code.starts_with("YT-"));

    // Codes are case-insensitive on redemption
    reactor
        .handle(verify_interaction(
            user("9", "member", "0"),
            Some(&code.to_lowercase()),
        ))
        .await;

    let grants = chat.role_grants();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].user_id, "9");
    assert_eq!(grants[0].role_id, "role-inner");
    assert_eq!(reactor.pending_grants(), 0);

    let replies = chat.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("verified"));
    assert_eq!(chat.embeds_in(WATCH).len(), 2);
}

#[tokio::test]
async fn unknown_code_is_rejected_ephemerally() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(verify_interaction(user("9", "member", "0"), Some("YT-ZZZZ")))
        .await;

    assert!(chat.role_grants().is_empty());
    let replies = chat.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("not recognized"));
}

#[tokio::test]
async fn missing_code_option_prompts_usage() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(verify_interaction(user("9", "member", "0"), None))
        .await;

    let replies = chat.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("/verify code:"));
}

#[tokio::test]
async fn failed_grant_leaves_the_code_consumed() {
    let chat = Arc::new(MockDiscordService::new().failing_roles_with("missing permissions"));
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(audit_message(WATCH, &submission("@NewUser", None, None)))
        .await;
    let code = chat.embeds_in(WATCH)[0]
        .field_value("One-Time Code")
        .unwrap()
        .to_string();

    reactor
        .handle(verify_interaction(user("9", "member", "0"), Some(&code)))
        .await;

    assert!(chat.role_grants().is_empty());
    assert_eq!(reactor.pending_grants(), 0);

    // The code was spent; a retry finds nothing
    reactor
        .handle(verify_interaction(user("9", "member", "0"), Some(&code)))
        .await;

    let replies = chat.replies();
    assert_eq!(replies.len(), 2);
    assert!(replies[0].contains("role assignment failed"));
    assert!(replies[1].contains("not recognized"));
}

#[tokio::test]
async fn integration_granted_tier_role_announces_auto_verified() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    // First sighting only seeds the role cache
    reactor
        .handle(GatewayEvent::GuildMemberUpdate(member(
            user("42", "fan", "0"),
            &["role-unrelated"],
        )))
        .await;
    assert!(chat.channel_embeds().is_empty());

    reactor
        .handle(GatewayEvent::GuildMemberUpdate(member(
            user("42", "fan", "0"),
            &["role-unrelated", "role-bff"],
        )))
        .await;

    let embeds = chat.embeds_in(WATCH);
    assert_eq!(embeds.len(), 1);
    assert_eq!(embeds[0].title.as_deref(), Some("YouTube Member Verified"));
    assert_eq!(
        embeds[0].footer.as_ref().map(|f| f.text.as_str()),
        Some("Auto-verified by Discord YouTube integration")
    );
    assert!(embeds[0]
        .field_value("Roles Assigned")
        .unwrap()
        .contains("role-bff"));

    // The registry was not involved and no role call was made by us
    assert!(chat.role_grants().is_empty());
    assert_eq!(chat.dms().len(), 1);
}

#[tokio::test]
async fn unrelated_role_changes_are_silent() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(GatewayEvent::GuildMemberUpdate(member(user("42", "fan", "0"), &[])))
        .await;
    reactor
        .handle(GatewayEvent::GuildMemberUpdate(member(
            user("42", "fan", "0"),
            &["role-unrelated"],
        )))
        .await;

    assert!(chat.channel_embeds().is_empty());
    assert!(chat.dms().is_empty());
}

#[tokio::test]
async fn messages_outside_the_watch_channel_are_ignored() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(audit_message(
            "general",
            &submission("@TestUser", Some("someone#1"), None),
        ))
        .await;

    assert_eq!(reactor.pending_grants(), 0);
    assert!(chat.channel_embeds().is_empty());
}

#[tokio::test]
async fn foreign_embeds_in_the_watch_channel_are_ignored() {
    let chat = Arc::new(MockDiscordService::new());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    let embed = discord::types::Embed::new()
        .title("Server Stats")
        .description("42 members online");
    reactor
        .handle(GatewayEvent::MessageCreate(Message {
            id: "m2".to_string(),
            channel_id: WATCH.to_string(),
            author: None,
            content: String::new(),
            embeds: vec![embed],
            webhook_id: None,
        }))
        .await;

    assert_eq!(reactor.pending_grants(), 0);
    assert!(chat.channel_embeds().is_empty());
}

#[tokio::test]
async fn closed_dms_do_not_fail_the_grant() {
    let chat = Arc::new(MockDiscordService::new().with_closed_dms());
    let mut reactor = Reactor::new(test_config(), chat.clone());

    reactor
        .handle(audit_message(
            WATCH,
            &submission("@TestUser", Some("shy#1234"), None),
        ))
        .await;
    reactor
        .handle(GatewayEvent::GuildMemberAdd(member(user("5", "shy", "1234"), &[])))
        .await;

    assert_eq!(chat.role_grants().len(), 1);
    assert!(chat.dms().is_empty());
    // Announcement still posted alongside the status reply
    assert_eq!(chat.embeds_in(WATCH).len(), 2);
}
