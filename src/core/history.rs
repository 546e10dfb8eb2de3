//! History store - The ordered list of past calculations.
//!
//! The whole history is one JSON array in a [`KeyValueSlot`], most recent first by
//! insertion. Reading never fails: a missing, unreadable or malformed document is an empty
//! history. Writing can fail, and those errors are returned. Load-then-save sequences hold
//! an async lock, so concurrent callers never see each other's half-finished updates.

use crate::{
    core::{
        record::{CalculationRecord, now_millis},
        slot::KeyValueSlot,
    },
    errors::Result,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Ordered, persisted collection of [`CalculationRecord`]s keyed by id.
#[derive(Debug)]
pub struct HistoryStore<S> {
    slot: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueSlot> HistoryStore<S> {
    /// Wraps the slot the history is stored in.
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying slot
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Returns the persisted history, or an empty one if there is nothing usable.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Vec<CalculationRecord> {
        let raw = match self.slot.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history slot, treating it as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CalculationRecord>>(&raw) {
            Ok(records) => {
                debug!(count = records.len(), "Loaded history");
                records
            }
            Err(e) => {
                warn!("Stored history is malformed, treating it as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrites the persisted history with `records`, in order.
    ///
    /// # Errors
    /// Returns an error if the history cannot be encoded or the slot write fails.
    pub async fn save(&self, records: &[CalculationRecord]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_records(records).await
    }

    /// Puts `record` in front of `existing` and persists the result.
    ///
    /// An entry of `existing` that shares the record's id is dropped, so ids stay unique.
    ///
    /// # Errors
    /// Returns an error if the write fails; nothing is persisted in that case.
    #[instrument(skip_all, fields(id = %record.id()))]
    pub async fn insert(
        &self,
        record: CalculationRecord,
        existing: Vec<CalculationRecord>,
    ) -> Result<Vec<CalculationRecord>> {
        let _guard = self.write_lock.lock().await;

        let mut history = Vec::with_capacity(existing.len() + 1);
        let id = record.id().to_string();
        history.push(record);
        history.extend(existing.into_iter().filter(|entry| entry.id() != id));

        self.write_records(&history).await?;
        info!(count = history.len(), "Inserted calculation into history");
        Ok(history)
    }

    /// Replaces the entry with the same id as `record`, stamping it with the current time.
    ///
    /// The entry keeps its position. When no entry matches, the history is returned as is
    /// and nothing is written.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    #[instrument(skip_all, fields(id = %record.id()))]
    pub async fn update_by_id(&self, record: CalculationRecord) -> Result<Vec<CalculationRecord>> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load().await;

        let Some(entry) = history.iter_mut().find(|entry| entry.id() == record.id()) else {
            debug!("No history entry with this id, nothing updated");
            return Ok(history);
        };
        *entry = record.touched(now_millis());

        self.write_records(&history).await?;
        info!("Updated calculation in history");
        Ok(history)
    }

    /// Removes the entry with `id`. An absent id leaves the history unchanged.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: &str) -> Result<Vec<CalculationRecord>> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load().await;

        let before = history.len();
        history.retain(|entry| entry.id() != id);

        self.write_records(&history).await?;
        info!(removed = before - history.len(), "Deleted calculation from history");
        Ok(history)
    }

    async fn write_records(&self, records: &[CalculationRecord]) -> Result<()> {
        let encoded = serde_json::to_string(records)?;
        self.slot.write(&encoded).await
    }
}
