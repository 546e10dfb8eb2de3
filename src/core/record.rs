//! Calculation records - The entries kept in the history.
//!
//! A record stores what the user entered plus the derived area and total. The derived
//! values are computed once at construction and have no setters, so they cannot drift
//! from their inputs. Records read back from storage are recomputed the same way.

use crate::core::calculation::{Eyelets, calculate_area, calculate_total_value};
use serde::{Deserialize, Serialize};

/// The user-entered values a record is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationInput {
    /// Width in centimeters
    pub width: f64,
    /// Height in centimeters
    pub height: f64,
    /// Price per square meter
    pub price_per_square_meter: f64,
    /// Optional fittings
    pub eyelets: Eyelets,
}

impl CalculationInput {
    /// A submission is only accepted when width, height and price are all positive.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.price_per_square_meter > 0.0
    }
}

/// One persisted calculation.
///
/// Serialized with camelCase keys:
/// `id`, `timestamp`, `width`, `height`, `pricePerSquareMeter`, `area`, `totalValue`,
/// `eyeletCount`, `eyeletPrice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRecord")]
pub struct CalculationRecord {
    id: String,
    timestamp: i64,
    width: f64,
    height: f64,
    price_per_square_meter: f64,
    area: f64,
    total_value: f64,
    eyelet_count: u32,
    eyelet_price: f64,
}

impl CalculationRecord {
    /// Computes a record from its inputs.
    #[must_use]
    pub fn compute(id: impl Into<String>, timestamp: i64, input: CalculationInput) -> Self {
        let eyelets = Eyelets::new(input.eyelets.count, input.eyelets.unit_price);
        let area = calculate_area(input.width, input.height);
        let total_value = calculate_total_value(area, input.price_per_square_meter, eyelets);

        Self {
            id: id.into(),
            timestamp,
            width: input.width,
            height: input.height,
            price_per_square_meter: input.price_per_square_meter,
            area,
            total_value,
            eyelet_count: eyelets.count,
            eyelet_price: eyelets.unit_price,
        }
    }

    /// Computes a record with a fresh random id, stamped with the current time.
    #[must_use]
    pub fn new(input: CalculationInput) -> Self {
        Self::compute(uuid::Uuid::new_v4().to_string(), now_millis(), input)
    }

    /// Same record with its timestamp moved to `timestamp`.
    #[must_use]
    pub fn touched(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Unique key, stable across edits
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last write time in epoch milliseconds
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Width in centimeters
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height in centimeters
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Price per square meter
    #[must_use]
    pub const fn price_per_square_meter(&self) -> f64 {
        self.price_per_square_meter
    }

    /// Area in square meters
    #[must_use]
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Area price plus fittings
    #[must_use]
    pub const fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Number of fittings, 0 when none were ordered
    #[must_use]
    pub const fn eyelet_count(&self) -> u32 {
        self.eyelet_count
    }

    /// Unit price of a fitting, 0 when none were ordered
    #[must_use]
    pub const fn eyelet_price(&self) -> f64 {
        self.eyelet_price
    }

    /// The fitting line of this record.
    #[must_use]
    pub const fn eyelets(&self) -> Eyelets {
        Eyelets {
            count: self.eyelet_count,
            unit_price: self.eyelet_price,
        }
    }

    /// The inputs this record was computed from.
    #[must_use]
    pub const fn input(&self) -> CalculationInput {
        CalculationInput {
            width: self.width,
            height: self.height,
            price_per_square_meter: self.price_per_square_meter,
            eyelets: self.eyelets(),
        }
    }
}

/// Current time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Shape of a record as found in storage. Derived fields present in the data are
/// ignored and recomputed. The eyelet count is read as any number so one odd entry
/// cannot make the whole history unreadable.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    id: String,
    timestamp: i64,
    width: f64,
    height: f64,
    price_per_square_meter: f64,
    #[serde(default)]
    eyelet_count: f64,
    #[serde(default)]
    eyelet_price: f64,
}

impl From<StoredRecord> for CalculationRecord {
    fn from(stored: StoredRecord) -> Self {
        Self::compute(
            stored.id,
            stored.timestamp,
            CalculationInput {
                width: stored.width,
                height: stored.height,
                price_per_square_meter: stored.price_per_square_meter,
                eyelets: Eyelets::new(stored_count(stored.eyelet_count), stored.eyelet_price),
            },
        )
    }
}

/// Truncates a stored count into range: negatives give 0, huge values `u32::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stored_count(value: f64) -> u32 {
    // `as` saturates at both ends of the range
    value.trunc() as u32
}
