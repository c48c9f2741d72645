//! Entry store port
//!
//! Persistence collaborator for evaluated entries. Entries own their
//! verdicts and debate; deleting an entry removes all of them.

use async_trait::async_trait;
use panel_domain::{DebateRecord, EntryRecord};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Invalid entry id {0:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidId(String),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt entry {entry_id}: {reason}")]
    Corrupt { entry_id: String, reason: String },
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert or replace an entry
    async fn save(&self, record: &EntryRecord) -> Result<(), StoreError>;

    /// Attach (or replace) the debate of an existing entry
    async fn attach_debate(
        &self,
        entry_id: &str,
        debate: DebateRecord,
    ) -> Result<EntryRecord, StoreError>;

    async fn get(&self, entry_id: &str) -> Result<Option<EntryRecord>, StoreError>;

    /// All entries, newest first
    async fn list(&self) -> Result<Vec<EntryRecord>, StoreError>;

    /// Delete an entry with its verdicts and debate; `false` if it did not exist
    async fn delete(&self, entry_id: &str) -> Result<bool, StoreError>;
}
