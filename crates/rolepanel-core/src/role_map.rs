//! Role-pair grammar (`sym:roleId[,sym:roleId...]`) and role-map merge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable entry of a panel: a visual symbol and the role it grants.
///
/// Serialized field names match the persisted record shape
/// (`{"emoji": "...", "roleId": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePair {
    pub emoji: String,
    #[serde(rename = "roleId")]
    pub role_id: String,
}

/// Errors produced while parsing a raw role-pair specification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RolePairParseError {
    #[error("invalid role pair format: \"{0}\" (must be emoji:roleId)")]
    MalformedToken(String),
    #[error("role specification cannot be empty")]
    EmptySpec,
}

/// Parses a comma-separated `emoji:roleId` specification into an ordered
/// pair list.
///
/// Each token is split on `:`; the first two trimmed parts become the symbol
/// and the role id, and both must be non-empty. A token that cannot produce
/// both parts fails the whole parse, naming the offending token. A role id
/// recurring within one specification keeps its position and takes the
/// last-written symbol.
pub fn parse_role_pair_spec(spec: &str) -> Result<Vec<RolePair>, RolePairParseError> {
    if spec.trim().is_empty() {
        return Err(RolePairParseError::EmptySpec);
    }
    let mut pairs: Vec<RolePair> = Vec::new();
    for token in spec.split(',') {
        let mut parts = token.split(':');
        let emoji = parts.next().map(str::trim).unwrap_or_default();
        let role_id = parts.next().map(str::trim).unwrap_or_default();
        if emoji.is_empty() || role_id.is_empty() {
            return Err(RolePairParseError::MalformedToken(token.trim().to_string()));
        }
        match pairs.iter_mut().find(|pair| pair.role_id == role_id) {
            Some(existing) => existing.emoji = emoji.to_string(),
            None => pairs.push(RolePair {
                emoji: emoji.to_string(),
                role_id: role_id.to_string(),
            }),
        }
    }
    Ok(pairs)
}

/// Merges a newly supplied pair list into an existing panel's pair list.
///
/// Existing pairs keep their order; a new pair whose role id matches an
/// existing one replaces that pair's symbol in place, and genuinely new
/// pairs are appended in input order. The result carries at most one entry
/// per role id, so merging the same input twice is a no-op.
pub fn merge_role_maps(existing: &[RolePair], incoming: &[RolePair]) -> Vec<RolePair> {
    let mut merged: Vec<RolePair> = existing.to_vec();
    for pair in incoming {
        match merged.iter_mut().find(|entry| entry.role_id == pair.role_id) {
            Some(entry) => entry.emoji = pair.emoji.clone(),
            None => merged.push(pair.clone()),
        }
    }
    merged
}
