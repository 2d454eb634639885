//! Platform call contract consumed by the runtime components.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by platform calls.
#[derive(Debug, Error)]
pub enum DiscordApiError {
    #[error("discord transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("discord returned status {status} for {endpoint}: {detail}")]
    Status {
        status: u16,
        endpoint: String,
        detail: String,
    },
    #[error("discord response missing field '{0}'")]
    MissingField(&'static str),
}

impl DiscordApiError {
    /// True for a plain 404, used by the message-location scan to keep
    /// probing other channels.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Identifier of a message created by [`DiscordApi::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
}

/// A role as listed by the guild roles endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuildRole {
    pub id: String,
    pub name: String,
}

/// A guild channel; `kind` is the raw Discord channel type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuildChannel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl GuildChannel {
    /// Channels that can hold a panel message: guild text (0) and
    /// announcement (5) channels.
    pub fn is_text_capable(&self) -> bool {
        matches!(self.kind, 0 | 5)
    }
}

/// Current membership state for one user in one guild.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuildMember {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The platform calls this system makes, one method per REST operation.
///
/// Implemented by [`crate::DiscordRestClient`] in production and by
/// in-memory substitutes in runtime tests.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Posts a new message (embeds + components body) and returns its id.
    async fn send_message(
        &self,
        channel_id: &str,
        body: &Value,
    ) -> Result<SentMessage, DiscordApiError>;

    /// Patches an existing message (component body).
    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        body: &Value,
    ) -> Result<(), DiscordApiError>;

    /// Probes whether `message_id` exists in `channel_id`.
    async fn message_exists(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<bool, DiscordApiError>;

    /// Lists all roles defined in the guild.
    async fn list_guild_roles(&self, guild_id: &str) -> Result<Vec<GuildRole>, DiscordApiError>;

    /// Lists all channels of the guild.
    async fn list_guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<GuildChannel>, DiscordApiError>;

    /// Fetches one member's current role ids.
    async fn fetch_member(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<GuildMember, DiscordApiError>;

    /// Grants `role_id` to the member.
    async fn add_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DiscordApiError>;

    /// Revokes `role_id` from the member.
    async fn remove_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DiscordApiError>;

    /// Sends a followup message for an acknowledged interaction.
    async fn create_followup(
        &self,
        application_id: &str,
        interaction_token: &str,
        body: &Value,
    ) -> Result<(), DiscordApiError>;

    /// Bulk-overwrites the application's slash commands, globally or for one
    /// guild.
    async fn overwrite_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &Value,
    ) -> Result<(), DiscordApiError>;
}
