//! Discord REST surface for the role-panel service.
//!
//! The platform is reached through the [`DiscordApi`] trait so runtime
//! components can be exercised against a substitute implementation;
//! [`DiscordRestClient`] is the production implementation over the v10 REST
//! API. Wire payload builders, interaction envelope types, webhook signature
//! verification, and the slash-command definitions also live here.

pub mod api;
pub mod commands;
pub mod interactions;
pub mod payloads;
pub mod rest;

pub use api::{
    DiscordApi, DiscordApiError, GuildChannel, GuildMember, GuildRole, SentMessage,
};
pub use commands::{command_definitions, COMMAND_CREATE_PANEL, COMMAND_EDIT_PANEL};
pub use interactions::{
    member_has_manage_roles, verify_interaction_signature, InteractionCommandOption,
    InteractionData, InteractionEnvelope, InteractionMember, InteractionMessage, InteractionUser,
    INTERACTION_TYPE_APPLICATION_COMMAND, INTERACTION_TYPE_MESSAGE_COMPONENT,
    INTERACTION_TYPE_PING, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
pub use payloads::{
    components_patch_body, deferred_update_response, ephemeral_followup_embed,
    ephemeral_followup_text, ephemeral_text_response, panel_embed, panel_message_body,
    pong_response, role_select_component, PanelTheme, RoleSelectOption, ROLE_SELECT_CUSTOM_ID,
};
pub use rest::{DiscordRestClient, DEFAULT_DISCORD_API_BASE};
