//! Dispatches verified interactions to the builder and the reconciler.

use std::sync::Arc;

use rolepanel_discord::{
    deferred_update_response, ephemeral_followup_embed, ephemeral_followup_text,
    ephemeral_text_response, member_has_manage_roles, pong_response, DiscordApi,
    InteractionEnvelope, PanelTheme, COMMAND_CREATE_PANEL, COMMAND_EDIT_PANEL,
    INTERACTION_TYPE_APPLICATION_COMMAND, INTERACTION_TYPE_MESSAGE_COMPONENT,
    INTERACTION_TYPE_PING, ROLE_SELECT_CUSTOM_ID,
};
use rolepanel_store::PanelStore;
use serde_json::Value;
use tracing::{error, warn};

use crate::panel_builder::{
    CreatePanelRequest, EditPanelRequest, PanelActionError, PanelBuilder,
};
use crate::reconciler::{RoleReconciler, SelectionSubmission};

const MISSING_PERMISSION_REPLY: &str =
    "❌ You need the **Manage Roles** permission to use this command.";
const GUILD_ONLY_REPLY: &str = "❌ This command can only be used inside a server.";
const CREATE_FAILED_REPLY: &str = "❌ Failed to create reaction role panel.";
const EDIT_FAILED_REPLY: &str = "❌ Failed to update the reaction role panel.";
const RECONCILE_OK_REPLY: &str = "✅ Your roles have been updated successfully!";
const RECONCILE_FAILED_REPLY: &str = "❌ There was an error updating your roles.";

/// Routes interactions and produces the immediate response body; component
/// followups are dispatched after the acknowledgment.
pub struct InteractionRouter {
    api: Arc<dyn DiscordApi>,
    builder: PanelBuilder,
    reconciler: RoleReconciler,
    theme: PanelTheme,
}

impl InteractionRouter {
    pub fn new(api: Arc<dyn DiscordApi>, store: PanelStore, theme: PanelTheme) -> Self {
        let builder = PanelBuilder::new(api.clone(), store.clone(), theme.clone());
        let reconciler = RoleReconciler::new(api.clone(), store);
        Self {
            api,
            builder,
            reconciler,
            theme,
        }
    }

    /// Handles one interaction and returns the response body to send back.
    pub async fn route(&self, envelope: &InteractionEnvelope) -> Value {
        match envelope.kind {
            INTERACTION_TYPE_PING => pong_response(),
            INTERACTION_TYPE_APPLICATION_COMMAND => self.handle_command(envelope).await,
            INTERACTION_TYPE_MESSAGE_COMPONENT => {
                let (ack, followup) = self.handle_component(envelope).await;
                if let Some(body) = followup {
                    self.spawn_followup(envelope, body);
                }
                ack
            }
            other => {
                warn!(kind = other, "unsupported interaction type");
                ephemeral_text_response("❌ Unsupported interaction.")
            }
        }
    }

    async fn handle_command(&self, envelope: &InteractionEnvelope) -> Value {
        let Some(data) = &envelope.data else {
            return ephemeral_text_response("❌ Malformed command payload.");
        };
        let (Some(guild_id), Some(member)) = (&envelope.guild_id, &envelope.member) else {
            return ephemeral_text_response(GUILD_ONLY_REPLY);
        };
        if !member_has_manage_roles(member) {
            return ephemeral_text_response(MISSING_PERMISSION_REPLY);
        }

        match data.name.as_deref() {
            Some(COMMAND_CREATE_PANEL) => {
                let Some(channel_id) = &envelope.channel_id else {
                    return ephemeral_text_response(GUILD_ONLY_REPLY);
                };
                let (Some(title), Some(description), Some(roles)) = (
                    data.string_option("title"),
                    data.string_option("description"),
                    data.string_option("roles"),
                ) else {
                    return ephemeral_text_response("❌ Missing a required option.");
                };
                let request = CreatePanelRequest {
                    guild_id: guild_id.clone(),
                    channel_id: channel_id.clone(),
                    title: title.to_string(),
                    description: description.to_string(),
                    raw_pairs: roles.to_string(),
                };
                match self.builder.create_panel(&request).await {
                    Ok(_) => {
                        ephemeral_text_response("✅ Reaction role panel created successfully!")
                    }
                    Err(PanelActionError::Invalid(message)) => {
                        ephemeral_text_response(&format!("❌ {message}"))
                    }
                    Err(PanelActionError::Platform(cause)) => {
                        error!(%cause, "create-panel platform failure");
                        ephemeral_text_response(CREATE_FAILED_REPLY)
                    }
                }
            }
            Some(COMMAND_EDIT_PANEL) => {
                let (Some(message_id), Some(roles)) = (
                    data.string_option("messageid"),
                    data.string_option("roles"),
                ) else {
                    return ephemeral_text_response("❌ Missing a required option.");
                };
                let request = EditPanelRequest {
                    guild_id: guild_id.clone(),
                    message_id: message_id.to_string(),
                    raw_pairs: roles.to_string(),
                };
                match self.builder.edit_panel(&request).await {
                    Ok(report) => ephemeral_text_response(&format!(
                        "✅ Panel updated successfully! Added {} role(s).",
                        report.submitted_pair_count
                    )),
                    Err(PanelActionError::Invalid(message)) => {
                        ephemeral_text_response(&format!("❌ {message}"))
                    }
                    Err(PanelActionError::Platform(cause)) => {
                        error!(%cause, "edit-panel platform failure");
                        ephemeral_text_response(EDIT_FAILED_REPLY)
                    }
                }
            }
            other => {
                warn!(command = ?other, "unknown command");
                ephemeral_text_response("❌ Unknown command.")
            }
        }
    }

    /// Computes the component acknowledgment and the optional ephemeral
    /// followup. Untracked panels and foreign components are acknowledged
    /// silently with no followup.
    pub(crate) async fn handle_component(
        &self,
        envelope: &InteractionEnvelope,
    ) -> (Value, Option<Value>) {
        let Some(data) = &envelope.data else {
            return (deferred_update_response(), None);
        };
        if data.custom_id.as_deref() != Some(ROLE_SELECT_CUSTOM_ID) {
            return (deferred_update_response(), None);
        }
        let (Some(message), Some(member)) = (&envelope.message, &envelope.member) else {
            return (deferred_update_response(), None);
        };

        let submission = SelectionSubmission {
            message_id: message.id.clone(),
            user_id: member.user.id.clone(),
            selected: data.values.clone(),
        };
        match self.reconciler.apply_selection(&submission).await {
            Ok(None) => (deferred_update_response(), None),
            Ok(Some(_outcomes)) => (
                deferred_update_response(),
                Some(ephemeral_followup_embed(&self.theme, RECONCILE_OK_REPLY)),
            ),
            Err(cause) => {
                error!(%cause, message_id = %submission.message_id, "reconciliation failed");
                (
                    deferred_update_response(),
                    Some(ephemeral_followup_text(RECONCILE_FAILED_REPLY)),
                )
            }
        }
    }

    /// Sends the followup after the acknowledgment response has been
    /// produced; followup failures are logged and dropped.
    fn spawn_followup(&self, envelope: &InteractionEnvelope, body: Value) {
        let api = self.api.clone();
        let application_id = envelope.application_id.clone();
        let token = envelope.token.clone();
        tokio::spawn(async move {
            if let Err(error) = api.create_followup(&application_id, &token, &body).await {
                warn!(%error, "interaction followup failed");
            }
        });
    }
}
