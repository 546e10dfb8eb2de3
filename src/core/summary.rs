//! Display text for results and history entries.
//!
//! Framework-agnostic: these functions only turn a [`CalculationRecord`] into strings,
//! leaving layout to whichever front end shows them.

use crate::core::{
    calculation::{format_area_display, format_as_currency_display},
    codec::format_plain_number,
    record::CalculationRecord,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Text shown for a freshly computed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    /// Area, e.g. `17.60 m²`
    pub area: String,
    /// Eyelet subtotal with its breakdown, only when eyelets were ordered
    pub eyelets: Option<String>,
    /// Total price, e.g. `R$ 2.670,00`
    pub total: String,
}

/// Builds the result panel text for `record`.
#[must_use]
pub fn summarize(record: &CalculationRecord) -> ResultSummary {
    ResultSummary {
        area: format_area_display(record.area()),
        eyelets: eyelet_breakdown(record),
        total: format_as_currency_display(record.total_value()),
    }
}

fn eyelet_breakdown(record: &CalculationRecord) -> Option<String> {
    let eyelets = record.eyelets();
    (eyelets.count > 0).then(|| {
        format!(
            "{} ({} un × {})",
            format_as_currency_display(eyelets.subtotal()),
            eyelets.count,
            format_as_currency_display(eyelets.unit_price)
        )
    })
}

/// Text shown for one entry of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Record id, used to edit or delete the entry
    pub id: String,
    /// Last write time, `dd/mm/yyyy, HH:MM:SS`
    pub written_at: String,
    /// `W x H cm`
    pub dimensions: String,
    /// Area, e.g. `17.60 m²`
    pub area: String,
    /// Price per square meter
    pub unit_price: String,
    /// `N un x price`, only when eyelets were ordered
    pub eyelets: Option<String>,
    /// Total price
    pub total: String,
}

/// Builds a history list entry, with the timestamp shown in local time.
#[must_use]
pub fn history_entry(record: &CalculationRecord) -> HistoryEntry {
    history_entry_in(record, &Local)
}

/// Builds a history list entry, with the timestamp shown in `zone`.
#[must_use]
pub fn history_entry_in<Tz>(record: &CalculationRecord, zone: &Tz) -> HistoryEntry
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let eyelets = record.eyelets();
    HistoryEntry {
        id: record.id().to_string(),
        written_at: format_timestamp_in(record.timestamp(), zone),
        dimensions: format!(
            "{}x{} cm",
            format_plain_number(record.width()),
            format_plain_number(record.height())
        ),
        area: format_area_display(record.area()),
        unit_price: format_as_currency_display(record.price_per_square_meter()),
        eyelets: (eyelets.count > 0).then(|| {
            format!(
                "{} un x {}",
                eyelets.count,
                format_as_currency_display(eyelets.unit_price)
            )
        }),
        total: format_as_currency_display(record.total_value()),
    }
}

/// Formats epoch milliseconds as `dd/mm/yyyy, HH:MM:SS` in `zone`. Out-of-range values
/// give an empty string.
#[must_use]
pub fn format_timestamp_in<Tz>(millis: i64, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|instant| {
            instant
                .with_timezone(zone)
                .format("%d/%m/%Y, %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}
