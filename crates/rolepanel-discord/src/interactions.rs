//! Interaction webhook envelope types and signature verification.
//!
//! Discord signs each webhook delivery with the application's ed25519 key
//! over `timestamp || body`; deliveries failing verification must be
//! rejected before any payload inspection.

use anyhow::{anyhow, bail, Context, Result};
use ed25519_dalek::{Signature, VerifyingKey};
use serde::Deserialize;
use serde_json::Value;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

pub const INTERACTION_TYPE_PING: u8 = 1;
pub const INTERACTION_TYPE_APPLICATION_COMMAND: u8 = 2;
pub const INTERACTION_TYPE_MESSAGE_COMPONENT: u8 = 3;

const MANAGE_ROLES_PERMISSION_BIT: u64 = 1 << 28;

/// Incoming interaction payload, decoded from the webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionEnvelope {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub member: Option<InteractionMember>,
    #[serde(default)]
    pub message: Option<InteractionMessage>,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

/// Guild member attached to an interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMember {
    pub user: InteractionUser,
    /// Decimal permission bitset as sent by the platform.
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    pub id: String,
}

/// The message a component interaction originated from.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMessage {
    pub id: String,
}

/// Command or component payload of the interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub options: Vec<InteractionCommandOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionCommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl InteractionData {
    /// Returns the string value of the named command option.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_str())
    }
}

/// True when the member's permission bitset includes Manage Roles.
pub fn member_has_manage_roles(member: &InteractionMember) -> bool {
    member
        .permissions
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(|bits| bits & MANAGE_ROLES_PERMISSION_BIT != 0)
        .unwrap_or(false)
}

/// Verifies the ed25519 signature of one webhook delivery.
pub fn verify_interaction_signature(
    public_key_hex: &str,
    signature_hex: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<()> {
    let public_key_bytes = decode_hex_fixed::<32>("public key", public_key_hex)?;
    let signature_bytes = decode_hex_fixed::<64>("signature", signature_hex)?;
    let verifying_key = VerifyingKey::from_bytes(&public_key_bytes)
        .context("failed to decode ed25519 public key bytes")?;
    let signature = Signature::from_bytes(&signature_bytes);
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    verifying_key
        .verify_strict(&message, &signature)
        .map_err(|error| anyhow!("invalid interaction signature: {error}"))?;
    Ok(())
}

fn decode_hex_fixed<const N: usize>(label: &str, raw: &str) -> Result<[u8; N]> {
    let raw = raw.trim();
    if raw.len() != N * 2 {
        bail!(
            "{} must be {} hex chars (got {})",
            label,
            N * 2,
            raw.len()
        );
    }
    let mut decoded = [0u8; N];
    for (index, chunk) in raw.as_bytes().chunks_exact(2).enumerate() {
        decoded[index] = hex_nibble(label, chunk[0])? << 4 | hex_nibble(label, chunk[1])?;
    }
    Ok(decoded)
}

fn hex_nibble(label: &str, byte: u8) -> Result<u8> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => bail!("{} contains a non-hex character", label),
    }
}
