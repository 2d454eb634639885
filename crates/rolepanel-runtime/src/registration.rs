//! Slash-command registration against the platform.

use anyhow::{Context, Result};
use rolepanel_discord::{command_definitions, DiscordApi};
use tracing::info;

/// Bulk-overwrites the application's commands, globally or for one guild.
pub async fn register_commands(
    api: &dyn DiscordApi,
    application_id: &str,
    guild_id: Option<&str>,
) -> Result<()> {
    let definitions = command_definitions();
    api.overwrite_commands(application_id, guild_id, &definitions)
        .await
        .context("failed to overwrite application commands")?;
    match guild_id {
        Some(guild_id) => info!(%guild_id, "registered guild slash commands"),
        None => info!("registered global slash commands"),
    }
    Ok(())
}
