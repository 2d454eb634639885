//! Operator actions: create and edit role panels.

use std::sync::Arc;

use rolepanel_core::{merge_role_maps, parse_role_pair_spec, RolePair};
use rolepanel_discord::{
    components_patch_body, panel_embed, panel_message_body, role_select_component, DiscordApi,
    DiscordApiError, GuildRole, PanelTheme, RoleSelectOption,
};
use rolepanel_store::{PanelRecord, PanelStore, PanelStoreError};
use thiserror::Error;
use tracing::{debug, info};

/// Failure taxonomy of the operator actions.
///
/// `Invalid` carries a message safe to show the operator (format,
/// validation, and lookup failures, reported before or instead of side
/// effects). `Platform` wraps store or platform call failures; callers
/// surface those as a generic error and log the detail.
#[derive(Debug, Error)]
pub enum PanelActionError {
    #[error("{0}")]
    Invalid(String),
    #[error("platform call failed: {0}")]
    Platform(anyhow::Error),
}

impl From<DiscordApiError> for PanelActionError {
    fn from(error: DiscordApiError) -> Self {
        Self::Platform(anyhow::Error::new(error))
    }
}

impl From<PanelStoreError> for PanelActionError {
    fn from(error: PanelStoreError) -> Self {
        Self::Platform(anyhow::Error::new(error))
    }
}

/// Inputs of the create-panel action.
#[derive(Debug, Clone)]
pub struct CreatePanelRequest {
    pub guild_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub raw_pairs: String,
}

/// Result of a successful create-panel action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePanelReport {
    pub message_id: String,
    pub pair_count: usize,
}

/// Inputs of the edit-panel action.
#[derive(Debug, Clone)]
pub struct EditPanelRequest {
    pub guild_id: String,
    pub message_id: String,
    pub raw_pairs: String,
}

/// Result of a successful edit-panel action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPanelReport {
    pub message_id: String,
    pub submitted_pair_count: usize,
    pub total_pair_count: usize,
}

/// Builds and mutates panel messages and their persisted pair-sets.
pub struct PanelBuilder {
    api: Arc<dyn DiscordApi>,
    store: PanelStore,
    theme: PanelTheme,
}

impl PanelBuilder {
    pub fn new(api: Arc<dyn DiscordApi>, store: PanelStore, theme: PanelTheme) -> Self {
        Self { api, store, theme }
    }

    /// Creates a new panel: validates the pair specification against the
    /// guild's roles, sends the card + select message, and records the
    /// pair-set keyed by the new message id.
    ///
    /// Validation is atomic: nothing is sent or stored unless every pair
    /// parses and every role id resolves. A send that succeeds followed by a
    /// store failure is still reported as an error; the message is then live
    /// but untracked.
    pub async fn create_panel(
        &self,
        request: &CreatePanelRequest,
    ) -> Result<CreatePanelReport, PanelActionError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(PanelActionError::Invalid(
                "panel title cannot be empty".to_string(),
            ));
        }
        let description = request.description.trim();
        if description.is_empty() {
            return Err(PanelActionError::Invalid(
                "panel description cannot be empty".to_string(),
            ));
        }
        let pairs = parse_role_pair_spec(&request.raw_pairs)
            .map_err(|error| PanelActionError::Invalid(error.to_string()))?;

        let guild_roles = self.api.list_guild_roles(&request.guild_id).await?;
        validate_role_ids(&pairs, &guild_roles)?;
        let options = select_options(&pairs, &guild_roles);

        let body = panel_message_body(
            panel_embed(&self.theme, title, description),
            role_select_component(&options),
        );
        let sent = self.api.send_message(&request.channel_id, &body).await?;
        debug!(message_id = %sent.id, pairs = pairs.len(), "panel message sent");

        self.store.upsert(&PanelRecord {
            message_id: sent.id.clone(),
            guild_id: request.guild_id.clone(),
            channel_id: request.channel_id.clone(),
            role_map: pairs.clone(),
        })?;
        info!(message_id = %sent.id, guild_id = %request.guild_id, "panel created");

        Ok(CreatePanelReport {
            message_id: sent.id,
            pair_count: pairs.len(),
        })
    }

    /// Merges new pairs into an existing tracked panel and rebuilds its
    /// select control in place. The card body is left untouched.
    pub async fn edit_panel(
        &self,
        request: &EditPanelRequest,
    ) -> Result<EditPanelReport, PanelActionError> {
        let incoming = parse_role_pair_spec(&request.raw_pairs)
            .map_err(|error| PanelActionError::Invalid(error.to_string()))?;

        let guild_roles = self.api.list_guild_roles(&request.guild_id).await?;
        validate_role_ids(&incoming, &guild_roles)?;

        let record = self.store.get(&request.message_id)?.ok_or_else(|| {
            PanelActionError::Invalid(format!(
                "no role panel found with message id {}",
                request.message_id
            ))
        })?;

        let merged = merge_role_maps(&record.role_map, &incoming);
        let channel_id = self.locate_panel_channel(&record).await?;

        let body = components_patch_body(role_select_component(&select_options(
            &merged,
            &guild_roles,
        )));
        self.api
            .edit_message(&channel_id, &request.message_id, &body)
            .await?;

        self.store.update_role_map(&request.message_id, &merged)?;
        info!(
            message_id = %request.message_id,
            added = incoming.len(),
            total = merged.len(),
            "panel updated"
        );

        Ok(EditPanelReport {
            message_id: request.message_id.clone(),
            submitted_pair_count: incoming.len(),
            total_pair_count: merged.len(),
        })
    }

    /// Resolves the channel holding the panel message.
    ///
    /// Records written by this version carry the channel id. Older records
    /// do not; those fall back to probing every text-capable channel of the
    /// guild, which is linear in the guild's channel count.
    async fn locate_panel_channel(&self, record: &PanelRecord) -> Result<String, PanelActionError> {
        if !record.channel_id.trim().is_empty() {
            return Ok(record.channel_id.clone());
        }
        let channels = self.api.list_guild_channels(&record.guild_id).await?;
        for channel in channels.iter().filter(|channel| channel.is_text_capable()) {
            match self
                .api
                .message_exists(&channel.id, &record.message_id)
                .await
            {
                Ok(true) => return Ok(channel.id.clone()),
                Ok(false) => {}
                Err(error) => {
                    debug!(
                        channel_id = %channel.id,
                        message_id = %record.message_id,
                        %error,
                        "channel probe failed, continuing scan"
                    );
                }
            }
        }
        Err(PanelActionError::Invalid(format!(
            "could not find message {} in any text channel",
            record.message_id
        )))
    }
}

fn validate_role_ids(pairs: &[RolePair], guild_roles: &[GuildRole]) -> Result<(), PanelActionError> {
    for pair in pairs {
        if !guild_roles.iter().any(|role| role.id == pair.role_id) {
            return Err(PanelActionError::Invalid(format!(
                "role id {} is invalid or missing",
                pair.role_id
            )));
        }
    }
    Ok(())
}

/// Builds select options for a pair-set. Role ids that no longer resolve
/// (deleted from the guild after the panel was written) keep the raw id as
/// their label; stored pairs are never re-validated.
fn select_options(pairs: &[RolePair], guild_roles: &[GuildRole]) -> Vec<RoleSelectOption> {
    pairs
        .iter()
        .map(|pair| {
            let label = guild_roles
                .iter()
                .find(|role| role.id == pair.role_id)
                .map(|role| role.name.clone())
                .unwrap_or_else(|| pair.role_id.clone());
            RoleSelectOption {
                label,
                value: pair.role_id.clone(),
                emoji: pair.emoji.clone(),
            }
        })
        .collect()
}
