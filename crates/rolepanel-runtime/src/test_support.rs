//! In-memory `DiscordApi` substitute used by the runtime tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rolepanel_discord::{
    DiscordApi, DiscordApiError, GuildChannel, GuildMember, GuildRole, SentMessage,
};
use serde_json::Value;

/// One recorded platform call, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    SendMessage {
        channel_id: String,
        body: Value,
    },
    EditMessage {
        channel_id: String,
        message_id: String,
        body: Value,
    },
    MessageProbe {
        channel_id: String,
        message_id: String,
    },
    AddRole {
        user_id: String,
        role_id: String,
    },
    RemoveRole {
        user_id: String,
        role_id: String,
    },
    Followup {
        token: String,
        body: Value,
    },
    OverwriteCommands {
        guild_id: Option<String>,
    },
}

#[derive(Default)]
pub struct MockDiscordApi {
    guild_roles: Mutex<Vec<GuildRole>>,
    guild_channels: Mutex<Vec<GuildChannel>>,
    member_roles: Mutex<Vec<String>>,
    existing_messages: Mutex<Vec<(String, String)>>,
    failing_role_ids: Mutex<Vec<String>>,
    sent_count: Mutex<u64>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockDiscordApi {
    pub fn add_guild_role(&self, id: &str, name: &str) {
        self.guild_roles.lock().unwrap().push(GuildRole {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn add_guild_channel(&self, id: &str, kind: u8) {
        self.guild_channels.lock().unwrap().push(GuildChannel {
            id: id.to_string(),
            kind,
        });
    }

    pub fn add_existing_message(&self, channel_id: &str, message_id: &str) {
        self.existing_messages
            .lock()
            .unwrap()
            .push((channel_id.to_string(), message_id.to_string()));
    }

    pub fn set_member_roles(&self, role_ids: &[&str]) {
        *self.member_roles.lock().unwrap() =
            role_ids.iter().map(|id| id.to_string()).collect();
    }

    /// Makes every grant/revoke of `role_id` fail with a 403.
    pub fn fail_mutations_for(&self, role_id: &str) {
        self.failing_role_ids
            .lock()
            .unwrap()
            .push(role_id.to_string());
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_error(&self, role_id: &str, endpoint: &str) -> Option<DiscordApiError> {
        if self
            .failing_role_ids
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == role_id)
        {
            return Some(DiscordApiError::Status {
                status: 403,
                endpoint: endpoint.to_string(),
                detail: "Missing Permissions".to_string(),
            });
        }
        None
    }
}

#[async_trait]
impl DiscordApi for MockDiscordApi {
    async fn send_message(
        &self,
        channel_id: &str,
        body: &Value,
    ) -> Result<SentMessage, DiscordApiError> {
        self.record(ApiCall::SendMessage {
            channel_id: channel_id.to_string(),
            body: body.clone(),
        });
        let mut count = self.sent_count.lock().unwrap();
        *count += 1;
        Ok(SentMessage {
            id: format!("msg-{count}"),
        })
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        body: &Value,
    ) -> Result<(), DiscordApiError> {
        self.record(ApiCall::EditMessage {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
            body: body.clone(),
        });
        Ok(())
    }

    async fn message_exists(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<bool, DiscordApiError> {
        self.record(ApiCall::MessageProbe {
            channel_id: channel_id.to_string(),
            message_id: message_id.to_string(),
        });
        Ok(self
            .existing_messages
            .lock()
            .unwrap()
            .iter()
            .any(|(channel, message)| channel == channel_id && message == message_id))
    }

    async fn list_guild_roles(&self, _guild_id: &str) -> Result<Vec<GuildRole>, DiscordApiError> {
        Ok(self.guild_roles.lock().unwrap().clone())
    }

    async fn list_guild_channels(
        &self,
        _guild_id: &str,
    ) -> Result<Vec<GuildChannel>, DiscordApiError> {
        Ok(self.guild_channels.lock().unwrap().clone())
    }

    async fn fetch_member(
        &self,
        _guild_id: &str,
        _user_id: &str,
    ) -> Result<GuildMember, DiscordApiError> {
        Ok(GuildMember {
            roles: self.member_roles.lock().unwrap().clone(),
        })
    }

    async fn add_member_role(
        &self,
        _guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DiscordApiError> {
        if let Some(error) = self.mutation_error(role_id, "add_member_role") {
            return Err(error);
        }
        self.record(ApiCall::AddRole {
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        });
        self.member_roles.lock().unwrap().push(role_id.to_string());
        Ok(())
    }

    async fn remove_member_role(
        &self,
        _guild_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<(), DiscordApiError> {
        if let Some(error) = self.mutation_error(role_id, "remove_member_role") {
            return Err(error);
        }
        self.record(ApiCall::RemoveRole {
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        });
        self.member_roles.lock().unwrap().retain(|id| id != role_id);
        Ok(())
    }

    async fn create_followup(
        &self,
        _application_id: &str,
        interaction_token: &str,
        body: &Value,
    ) -> Result<(), DiscordApiError> {
        self.record(ApiCall::Followup {
            token: interaction_token.to_string(),
            body: body.clone(),
        });
        Ok(())
    }

    async fn overwrite_commands(
        &self,
        _application_id: &str,
        guild_id: Option<&str>,
        _commands: &Value,
    ) -> Result<(), DiscordApiError> {
        self.record(ApiCall::OverwriteCommands {
            guild_id: guild_id.map(str::to_string),
        });
        Ok(())
    }
}
