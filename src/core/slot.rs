//! Key-value slots - The single persistence seam of the calculator.
//!
//! The history lives in one named slot holding a serialized document. Anything that can
//! read and overwrite that document satisfies [`KeyValueSlot`]: a row in the database for
//! the real application, or plain memory for tests and throwaway sessions.

use crate::{
    entities::{StorageSlot, StorageSlotColumn, storage_slot},
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument};

/// A named slot holding one serialized document.
pub trait KeyValueSlot: Send + Sync {
    /// Returns the stored document, or `None` if the slot was never written.
    fn read(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Replaces the stored document.
    fn write(&self, value: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Slot backed by a row of the `storage_slots` table.
#[derive(Debug, Clone)]
pub struct DatabaseSlot {
    db: DatabaseConnection,
    key: String,
}

impl DatabaseSlot {
    /// Addresses the row named `key`. Nothing is written until the first [`write`].
    ///
    /// [`write`]: KeyValueSlot::write
    #[must_use]
    pub fn new(db: DatabaseConnection, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    /// Name of the row this slot reads and writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl KeyValueSlot for DatabaseSlot {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn read(&self) -> Result<Option<String>> {
        let slot = StorageSlot::find_by_id(self.key.clone())
            .one(&self.db)
            .await?;
        debug!(found = slot.is_some(), "Read storage slot");
        Ok(slot.map(|slot| slot.value))
    }

    #[instrument(skip(self, value), fields(key = %self.key, bytes = value.len()))]
    async fn write(&self, value: &str) -> Result<()> {
        let slot = storage_slot::ActiveModel {
            key: Set(self.key.clone()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now()),
        };

        StorageSlot::insert(slot)
            .on_conflict(
                OnConflict::column(StorageSlotColumn::Key)
                    .update_columns([StorageSlotColumn::Value, StorageSlotColumn::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!("Wrote storage slot");
        Ok(())
    }
}

/// Slot kept in process memory.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    /// An empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `value`
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl KeyValueSlot for MemorySlot {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn write(&self, value: &str) -> Result<()> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }
}
