//! Wire types shared by the REST and gateway surfaces.
//!
//! Only the fields this crate's consumers read are modeled; everything else
//! Discord sends is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Message flag marking an interaction reply visible only to the invoker.
pub const EPHEMERAL: u64 = 1 << 6;

/// Application command option type for a string argument.
pub const OPTION_STRING: u8 = 3;

// =============================================================================
// Embeds
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Stamp the embed with the current time (ISO-8601, as Discord expects).
    pub fn timestamp_now(mut self) -> Self {
        self.timestamp = Some(chrono::Utc::now().to_rfc3339());
        self
    }

    /// Look up a named field's value (exact match).
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// All human-readable text in the embed, joined for substring scans.
    pub fn flattened_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(t) = &self.title {
            parts.push(t);
        }
        if let Some(d) = &self.description {
            parts.push(d);
        }
        for f in &self.fields {
            parts.push(&f.name);
            parts.push(&f.value);
        }
        parts.join("\n")
    }
}

// =============================================================================
// REST payloads
// =============================================================================

/// Body for `POST /channels/{id}/messages`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl CreateMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// Body for executing a webhook.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Legacy-compatible handle: `name#1234` for old accounts, plain
    /// username for accounts migrated off discriminators.
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMember {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Present on gateway member events, absent on REST member objects.
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default)]
    pub webhook_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
}

// =============================================================================
// Interactions (slash commands)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub data: Option<InteractionData>,
    #[serde(default)]
    pub member: Option<GuildMember>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Interaction {
    /// The user who triggered the interaction (guild or DM context).
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.name.as_str())
    }

    /// Value of a string option by name.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Body for `POST /interactions/{id}/{token}/callback`.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    pub data: InteractionResponseData,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InteractionResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    /// Plain channel-message reply (callback type 4).
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: 4,
            data: InteractionResponseData {
                content: Some(content.into()),
                ..Default::default()
            },
        }
    }

    /// Reply visible only to the invoker.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: 4,
            data: InteractionResponseData {
                content: Some(content.into()),
                flags: Some(EPHEMERAL),
                ..Default::default()
            },
        }
    }
}

// =============================================================================
// Application commands
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_field_lookup_is_exact() {
        let embed = Embed::new()
            .title("Status")
            .field("Discord", "someone#1234", true)
            .field("Email", "a@b.c", true);

        assert_eq!(embed.field_value("Discord"), Some("someone#1234"));
        assert_eq!(embed.field_value("discord"), None);
        assert!(embed.flattened_text().contains("a@b.c"));
    }

    #[test]
    fn user_tag_handles_migrated_accounts() {
        let legacy = User {
            id: "1".into(),
            username: "someone".into(),
            discriminator: "1234".into(),
            global_name: None,
            bot: false,
        };
        let migrated = User {
            id: "2".into(),
            username: "newname".into(),
            discriminator: "0".into(),
            global_name: Some("New Name".into()),
            bot: false,
        };

        assert_eq!(legacy.tag(), "someone#1234");
        assert_eq!(migrated.tag(), "newname");
    }

    #[test]
    fn interaction_string_option() {
        let raw = serde_json::json!({
            "id": "99",
            "token": "tok",
            "data": {
                "name": "verify",
                "options": [{"name": "code", "value": "YT-AB12"}]
            },
            "member": {
                "user": {"id": "5", "username": "someone", "discriminator": "0"}
            }
        });
        let interaction: Interaction = serde_json::from_value(raw).unwrap();

        assert_eq!(interaction.command_name(), Some("verify"));
        assert_eq!(interaction.string_option("code"), Some("YT-AB12"));
        assert_eq!(interaction.invoker().unwrap().username, "someone");
    }

    #[test]
    fn empty_embed_serializes_without_nulls() {
        let payload = WebhookPayload::text("hello");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hello"}));
    }
}
