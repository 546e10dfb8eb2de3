//! Shared test utilities.
//!
//! Helpers for setting up test databases, tracing and calculation inputs with
//! sensible defaults.

use crate::{
    core::{
        calculation::Eyelets,
        history::HistoryStore,
        record::{CalculationInput, CalculationRecord},
        slot::{DatabaseSlot, KeyValueSlot, MemorySlot},
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, DbErr};
use tracing_subscriber::EnvFilter;

/// Routes tracing output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// History store on a fresh in-memory database, using the default slot name.
pub async fn setup_db_history() -> Result<HistoryStore<DatabaseSlot>> {
    let db = setup_test_db().await?;
    Ok(HistoryStore::new(DatabaseSlot::new(
        db,
        crate::config::settings::DEFAULT_HISTORY_KEY,
    )))
}

/// History store on an empty memory slot.
#[must_use]
pub fn memory_history() -> HistoryStore<MemorySlot> {
    HistoryStore::new(MemorySlot::new())
}

/// The reference banner: 550 x 320 cm at 150 per m² with 12 eyelets at 2.50.
///
/// Area 17.6 m², total 2670.
#[must_use]
pub const fn banner_input() -> CalculationInput {
    CalculationInput {
        width: 550.0,
        height: 320.0,
        price_per_square_meter: 150.0,
        eyelets: Eyelets {
            count: 12,
            unit_price: 2.5,
        },
    }
}

/// A record for `banner_input` with a fixed id and timestamp.
#[must_use]
pub fn banner_record(id: &str) -> CalculationRecord {
    CalculationRecord::compute(id, 1_700_000_000_000, banner_input())
}

/// A plain 1 x 1 m record at `price` per m², no eyelets.
#[must_use]
pub fn square_meter_record(id: &str, price: f64) -> CalculationRecord {
    CalculationRecord::compute(
        id,
        1_700_000_000_000,
        CalculationInput {
            width: 100.0,
            height: 100.0,
            price_per_square_meter: price,
            eyelets: Eyelets::default(),
        },
    )
}

/// Slot whose reads and writes always fail.
#[derive(Debug, Default)]
pub struct BrokenSlot;

impl KeyValueSlot for BrokenSlot {
    async fn read(&self) -> Result<Option<String>> {
        Err(Error::Database(DbErr::Custom("slot unavailable".to_string())))
    }

    async fn write(&self, _value: &str) -> Result<()> {
        Err(Error::Database(DbErr::Custom("slot is read-only".to_string())))
    }
}
