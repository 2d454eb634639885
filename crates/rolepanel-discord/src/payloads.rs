//! Wire payload builders for panel messages and interaction responses.

use serde_json::{json, Value};

/// Custom id shared by every panel's select control; the interaction router
/// keys on it.
pub const ROLE_SELECT_CUSTOM_ID: &str = "reaction_roles";

const ROLE_SELECT_PLACEHOLDER: &str = "Choose your roles";

const INTERACTION_RESPONSE_PONG: u8 = 1;
const INTERACTION_RESPONSE_CHANNEL_MESSAGE: u8 = 4;
const INTERACTION_RESPONSE_DEFERRED_UPDATE: u8 = 6;
const MESSAGE_FLAG_EPHEMERAL: u64 = 1 << 6;

/// Visual theme applied to every panel card and confirmation embed.
///
/// Injected into the runtime at construction; there is no global theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelTheme {
    pub color: u32,
    pub footer: String,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            color: 0x00FFFF,
            footer: "Role Panel".to_string(),
        }
    }
}

/// One selectable entry of the choice control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSelectOption {
    pub label: String,
    pub value: String,
    pub emoji: String,
}

/// Informational card shown above the select control.
pub fn panel_embed(theme: &PanelTheme, title: &str, description: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "color": theme.color,
        "footer": { "text": theme.footer },
    })
}

/// Action row holding the role select control, allowing 0..N selections.
pub fn role_select_component(options: &[RoleSelectOption]) -> Value {
    let encoded: Vec<Value> = options
        .iter()
        .map(|option| {
            json!({
                "label": option.label,
                "value": option.value,
                "emoji": { "name": option.emoji },
            })
        })
        .collect();
    json!({
        "type": 1,
        "components": [{
            "type": 3,
            "custom_id": ROLE_SELECT_CUSTOM_ID,
            "placeholder": ROLE_SELECT_PLACEHOLDER,
            "min_values": 0,
            "max_values": options.len(),
            "options": encoded,
        }],
    })
}

/// Body for creating a new panel message.
pub fn panel_message_body(embed: Value, component: Value) -> Value {
    json!({ "embeds": [embed], "components": [component] })
}

/// Body for patching only the components of an existing panel message; the
/// card is left untouched.
pub fn components_patch_body(component: Value) -> Value {
    json!({ "components": [component] })
}

/// Response to a webhook PING.
pub fn pong_response() -> Value {
    json!({ "type": INTERACTION_RESPONSE_PONG })
}

/// Ephemeral text reply, visible only to the invoking user.
pub fn ephemeral_text_response(content: &str) -> Value {
    json!({
        "type": INTERACTION_RESPONSE_CHANNEL_MESSAGE,
        "data": { "content": content, "flags": MESSAGE_FLAG_EPHEMERAL },
    })
}

/// Silent acknowledgment of a component interaction.
pub fn deferred_update_response() -> Value {
    json!({ "type": INTERACTION_RESPONSE_DEFERRED_UPDATE })
}

/// Ephemeral followup carrying plain text.
pub fn ephemeral_followup_text(content: &str) -> Value {
    json!({ "content": content, "flags": MESSAGE_FLAG_EPHEMERAL })
}

/// Ephemeral followup carrying a themed embed.
pub fn ephemeral_followup_embed(theme: &PanelTheme, description: &str) -> Value {
    json!({
        "embeds": [{ "color": theme.color, "description": description }],
        "flags": MESSAGE_FLAG_EPHEMERAL,
    })
}
