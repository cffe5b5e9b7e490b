//! Versioned audit events posted to the Discord watch channel.
//!
//! The webhook embed is the only channel between the HTTP server and the
//! bot process, so both directions live here: `to_embed` is what the
//! server posts, `from_embed` is how the bot reads it back. The footer
//! carries the schema version; embeds with any other footer are ignored.

use discord::types::Embed;

use super::tier::Tier;

pub const AUDIT_TITLE: &str = "New YouTube Member Verification";
pub const AUDIT_FOOTER: &str = "YouTube → Discord Bridge · schema v1";
pub const AUDIT_COLOR: u32 = 0xFF5A1F;

/// Placeholder written into the Discord field when the submitter left
/// no chat handle. Readers must map it back to `None`.
const UNKNOWN_HANDLE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    Submission {
        youtube_handle: String,
        discord_handle: Option<String>,
        email: String,
        email_status: String,
        tier: Option<Tier>,
    },
}

impl AuditEvent {
    pub fn submission(
        youtube_handle: impl Into<String>,
        discord_handle: Option<String>,
        email: impl Into<String>,
        email_status: impl Into<String>,
        tier: Option<Tier>,
    ) -> Self {
        Self::Submission {
            youtube_handle: youtube_handle.into(),
            discord_handle,
            email: email.into(),
            email_status: email_status.into(),
            tier,
        }
    }

    pub fn to_embed(&self) -> Embed {
        match self {
            Self::Submission {
                youtube_handle,
                discord_handle,
                email,
                email_status,
                tier,
            } => {
                let discord = discord_handle.as_deref().unwrap_or(UNKNOWN_HANDLE);
                let mut embed = Embed::new()
                    .title(AUDIT_TITLE)
                    .color(AUDIT_COLOR)
                    .field("YouTube", youtube_handle, true)
                    .field("Discord", discord, true)
                    .field("Email", email, true);
                if let Some(tier) = tier {
                    embed = embed.field(
                        "Tier",
                        format!("{} ({})", tier.label(), tier.price_tag()),
                        true,
                    );
                }
                embed
                    .field("Email Status", email_status, false)
                    .footer_text(AUDIT_FOOTER)
                    .timestamp_now()
            }
        }
    }

    /// Read an audit event back out of a channel embed. Returns `None`
    /// for anything that is not a schema-v1 submission, including
    /// embeds posted by other integrations into the same channel.
    pub fn from_embed(embed: &Embed) -> Option<Self> {
        if embed.title.as_deref() != Some(AUDIT_TITLE) {
            return None;
        }
        let footer = embed.footer.as_ref()?;
        if footer.text != AUDIT_FOOTER {
            return None;
        }

        let youtube_handle = embed.field_value("YouTube")?.trim().to_string();
        if youtube_handle.is_empty() {
            return None;
        }
        let discord_handle = embed
            .field_value("Discord")
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != UNKNOWN_HANDLE)
            .map(String::from);
        let email = embed.field_value("Email").unwrap_or_default().to_string();
        let email_status = embed
            .field_value("Email Status")
            .unwrap_or_default()
            .to_string();
        let tier = Tier::detect(&embed.flattened_text());

        Some(Self::Submission {
            youtube_handle,
            discord_handle,
            email,
            email_status,
            tier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(discord_handle: Option<String>, tier: Option<Tier>) -> AuditEvent {
        AuditEvent::submission(
            "@TestUser",
            discord_handle,
            "test@example.com",
            "Sent via resend",
            tier,
        )
    }

    #[test]
    fn submission_round_trips_through_embed() {
        let event = sample(Some("testuser#1234".to_string()), None);
        let parsed = AuditEvent::from_embed(&event.to_embed());
        assert_eq!(parsed, Some(event));
    }

    #[test]
    fn missing_discord_handle_round_trips_to_none() {
        let event = sample(None, None);
        let embed = event.to_embed();
        assert_eq!(embed.field_value("Discord"), Some("Unknown"));

        let parsed = AuditEvent::from_embed(&embed);
        assert_eq!(parsed, Some(event));
    }

    #[test]
    fn tier_field_round_trips() {
        let event = sample(Some("testuser#1234".to_string()), Some(Tier::Elite));
        let embed = event.to_embed();
        assert_eq!(embed.field_value("Tier"), Some("Elite ($24.99)"));

        let parsed = AuditEvent::from_embed(&embed);
        assert_eq!(parsed, Some(event));
    }

    #[test]
    fn foreign_embed_is_rejected() {
        let embed = Embed::new()
            .title("Server Stats")
            .field("YouTube", "@TestUser", true)
            .footer_text(AUDIT_FOOTER);
        assert_eq!(AuditEvent::from_embed(&embed), None);
    }

    #[test]
    fn schema_version_mismatch_is_rejected() {
        let embed = sample(None, None)
            .to_embed()
            .footer_text("YouTube → Discord Bridge · schema v2");
        assert_eq!(AuditEvent::from_embed(&embed), None);
    }

    #[test]
    fn embed_without_youtube_field_is_rejected() {
        let embed = Embed::new()
            .title(AUDIT_TITLE)
            .field("Discord", "someone#1234", true)
            .footer_text(AUDIT_FOOTER);
        assert_eq!(AuditEvent::from_embed(&embed), None);
    }
}
