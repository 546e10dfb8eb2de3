//! Core business logic - framework-agnostic calculation, formatting and history operations.
//!
//! Data flows from typed text through [`codec`] into numbers, through [`calculation`] into a
//! [`record::CalculationRecord`], and into [`history`] for persistence. [`form`] ties these
//! together for one interactive session.

/// Area and price derivation
pub mod calculation;
/// Locale-aware number parsing and formatting
pub mod codec;
/// Interactive form state and submit/edit/delete flow
pub mod form;
/// Persisted, ordered calculation history
pub mod history;
/// Calculation records and their inputs
pub mod record;
/// Key-value storage slots
pub mod slot;
/// Display text for results and history entries
pub mod summary;
