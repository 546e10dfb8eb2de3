//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod storage_slot;

pub use storage_slot::{
    Column as StorageSlotColumn, Entity as StorageSlot, Model as StorageSlotModel,
};
