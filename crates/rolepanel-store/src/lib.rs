//! SQLite-backed persistence for role panels.
//!
//! One table keyed by message id; the pair-set is stored as a JSON text
//! column in panel order. Each operation is single-row, no cross-panel
//! transactions exist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rolepanel_core::RolePair;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Result type for panel store operations.
pub type StoreResult<T> = Result<T, PanelStoreError>;

/// Errors returned by the panel store.
#[derive(Debug, Error)]
pub enum PanelStoreError {
    #[error("no role panel recorded for message id '{0}'")]
    PanelNotFound(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One tracked panel: the message it lives on, its owning guild and channel,
/// and its ordered pair-set.
///
/// `channel_id` may be empty for records written before the column existed;
/// callers fall back to a guild-wide scan for those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRecord {
    pub message_id: String,
    pub guild_id: String,
    pub channel_id: String,
    pub role_map: Vec<RolePair>,
}

/// Persistent mapping from message id to panel record.
#[derive(Debug, Clone)]
pub struct PanelStore {
    db_path: PathBuf,
}

impl PanelStore {
    /// Opens (creating if needed) the panel database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self { db_path };
        let connection = store.connection()?;
        connection.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS panels (
                message_id TEXT PRIMARY KEY,
                guild_id TEXT NOT NULL,
                channel_id TEXT NOT NULL DEFAULT '',
                role_map TEXT NOT NULL
            );
            "#,
        )?;
        Ok(store)
    }

    fn connection(&self) -> StoreResult<Connection> {
        let connection = Connection::open(&self.db_path)?;
        connection.busy_timeout(Duration::from_secs(5))?;
        connection.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        Ok(connection)
    }

    /// Fetches the panel recorded for `message_id`, if any.
    pub fn get(&self, message_id: &str) -> StoreResult<Option<PanelRecord>> {
        let connection = self.connection()?;
        let row = connection
            .query_row(
                "SELECT message_id, guild_id, channel_id, role_map FROM panels WHERE message_id = ?1",
                params![message_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        let Some((message_id, guild_id, channel_id, role_map_json)) = row else {
            return Ok(None);
        };
        let role_map: Vec<RolePair> = serde_json::from_str(&role_map_json)?;
        Ok(Some(PanelRecord {
            message_id,
            guild_id,
            channel_id,
            role_map,
        }))
    }

    /// Inserts or fully replaces the record for its message id.
    pub fn upsert(&self, record: &PanelRecord) -> StoreResult<()> {
        let role_map_json = serde_json::to_string(&record.role_map)?;
        let connection = self.connection()?;
        connection.execute(
            "INSERT OR REPLACE INTO panels (message_id, guild_id, channel_id, role_map) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.message_id,
                record.guild_id,
                record.channel_id,
                role_map_json
            ],
        )?;
        Ok(())
    }

    /// Replaces only the pair-set of an existing record.
    ///
    /// Fails with [`PanelStoreError::PanelNotFound`] when no record exists
    /// for `message_id`; guild and channel ids are left untouched.
    pub fn update_role_map(&self, message_id: &str, role_map: &[RolePair]) -> StoreResult<()> {
        let role_map_json = serde_json::to_string(role_map)?;
        let connection = self.connection()?;
        let updated = connection.execute(
            "UPDATE panels SET role_map = ?1 WHERE message_id = ?2",
            params![role_map_json, message_id],
        )?;
        if updated == 0 {
            return Err(PanelStoreError::PanelNotFound(message_id.to_string()));
        }
        Ok(())
    }

    /// Number of tracked panels, used for startup diagnostics.
    pub fn len(&self) -> StoreResult<u64> {
        let connection = self.connection()?;
        let count: u64 = connection.query_row("SELECT COUNT(1) FROM panels", [], |row| row.get(0))?;
        Ok(count)
    }

    /// True when no panels are tracked.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
