//! Storage slot entity - Named key-value slots.
//! Each row holds one serialized document addressed by a fixed name, such as the
//! calculation history under `"calculator_history"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storage slot database model - one named document per row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_slots")]
pub struct Model {
    /// Slot name (e.g., `"calculator_history"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Serialized document
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the slot was last written
    pub updated_at: DateTimeUtc,
}

/// `StorageSlot` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
