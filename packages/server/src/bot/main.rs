// Main entry point for the role-grant bot

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge_core::domains::grants::Reactor;
use bridge_core::kernel::DiscordAdapter;
use bridge_core::BotConfig;
use discord::gateway::{intents, Gateway};
use discord::types::{ApplicationCommand, CommandOption, OPTION_STRING};
use discord::{DiscordClient, DiscordOptions};

const FALLBACK_GATEWAY_URL: &str = "wss://gateway.discord.gg";

fn verify_command() -> ApplicationCommand {
    ApplicationCommand {
        name: "verify".to_string(),
        description: "Redeem a one-time verification code".to_string(),
        options: vec![CommandOption {
            kind: OPTION_STRING,
            name: "code".to_string(),
            description: "The code from your verification status message".to_string(),
            required: true,
        }],
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bridge_core=debug,discord=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting role-grant bot");

    let config = BotConfig::from_env().context("Failed to load bot configuration")?;
    let client = Arc::new(DiscordClient::new(DiscordOptions {
        bot_token: config.bot_token.clone(),
    }));

    // Slash command registration is best-effort: a stale command still
    // works, so a failure here should not keep the bot offline
    if let Err(err) = client
        .set_guild_commands(&config.application_id, &config.guild_id, &[verify_command()])
        .await
    {
        tracing::warn!(error = %err, "failed to register slash commands");
    }

    let gateway_url = match client.get_gateway_url().await {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(error = %err, "failed to fetch gateway URL, using fallback");
            FALLBACK_GATEWAY_URL.to_string()
        }
    };

    let gateway = Gateway::new(
        config.bot_token.clone(),
        intents::GUILDS | intents::GUILD_MEMBERS | intents::GUILD_MESSAGES | intents::MESSAGE_CONTENT,
        gateway_url,
    );
    let mut events = gateway.spawn();

    let mut reactor = Reactor::new(config, Arc::new(DiscordAdapter(client)));
    while let Some(event) = events.recv().await {
        reactor.handle(event).await;
    }

    tracing::info!("Gateway stream closed, shutting down");
    Ok(())
}
