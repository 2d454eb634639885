//! `reqwest`-backed implementation of [`DiscordApi`] over the v10 REST API.

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{
    DiscordApi, DiscordApiError, GuildChannel, GuildMember, GuildRole, SentMessage,
};

pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";

const ERROR_DETAIL_MAX_CHARS: usize = 400;
const ROLE_MUTATION_AUDIT_REASON: &str = "role panel selection";

/// REST client holding the bot token and a configurable API base.
#[derive(Debug, Clone)]
pub struct DiscordRestClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl DiscordRestClient {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        audit_reason: Option<&str>,
    ) -> Result<Response, DiscordApiError> {
        let endpoint = self.endpoint(path);
        let mut request = self
            .http
            .request(method, &endpoint)
            .header("Authorization", format!("Bot {}", self.bot_token));
        if let Some(reason) = audit_reason {
            request = request.header("X-Audit-Log-Reason", reason);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_DETAIL_MAX_CHARS)
                .collect();
            return Err(DiscordApiError::Status {
                status: status.as_u16(),
                endpoint,
                detail,
            });
        }
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, DiscordApiError> {
        let response = self.request(method, path, body, None).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DiscordApi for DiscordRestClient {
    async fn send_message(
        &self,
        channel_id: &str,
        body: &Value,
    ) -> Result<SentMessage, DiscordApiError> {
        let created: Value = self
            .request_json(
                Method::POST,
                &format!("/channels/{channel_id}/messages"),
                Some(body),
            )
            .await?;
        let id = created
            .get("id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(DiscordApiError::MissingField("id"))?;
        Ok(SentMessage { id: id.to_string() })
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        body: &Value,
    ) -> Result<(), DiscordApiError> {
        self.request(
            Method::PATCH,
            &format!("/channels/{channel_id}/messages/{message_id}"),
            Some(body),
            None,
        )
        .await?;
        Ok(())
    }

    async fn message_exists(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<bool, DiscordApiError> {
        let result = self
            .request(
                Method::GET,
                &format!("/channels/{channel_id}/messages/{message_id}"),
                None,
                None,
            )
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    async fn list_guild_roles(&self, guild_id: &str) -> Result<Vec<GuildRole>, DiscordApiError> {
        self.request_json(Method::GET, &format!("/guilds/{guild_id}/roles"), None)
            .await
    }

    async fn list_guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<GuildChannel>, DiscordApiError> {
        self.request_json(Method::GET, &format!("/guilds/{guild_id}/channels"), None)
            .await
    }

    async fn fetch_member(
        &self,
        guild_id: &str,
        user_id: &str,
    ) -> Result<GuildMember, DiscordApiError> {
        self.request_json(
            Method::GET,
            &format!("/guilds/{guild_id}/members/{user_id}"),
            None,
        )
        .await
    }

    async fn add_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DiscordApiError> {
        self.request(
            Method::PUT,
            &format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"),
            None,
            Some(ROLE_MUTATION_AUDIT_REASON),
        )
        .await?;
        Ok(())
    }

    async fn remove_member_role(
        &self,
        guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DiscordApiError> {
        self.request(
            Method::DELETE,
            &format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"),
            None,
            Some(ROLE_MUTATION_AUDIT_REASON),
        )
        .await?;
        Ok(())
    }

    async fn create_followup(
        &self,
        application_id: &str,
        interaction_token: &str,
        body: &Value,
    ) -> Result<(), DiscordApiError> {
        self.request(
            Method::POST,
            &format!("/webhooks/{application_id}/{interaction_token}"),
            Some(body),
            None,
        )
        .await?;
        Ok(())
    }

    async fn overwrite_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &Value,
    ) -> Result<(), DiscordApiError> {
        let path = match guild_id {
            Some(guild_id) => {
                format!("/applications/{application_id}/guilds/{guild_id}/commands")
            }
            None => format!("/applications/{application_id}/commands"),
        };
        self.request(Method::PUT, &path, Some(commands), None)
            .await?;
        Ok(())
    }
}
