//! Calculation engine - Area and price derivation for a rectangular piece.
//!
//! Dimensions arrive in centimeters, prices in currency units per square meter. These
//! functions are pure and total; rejecting zero, negative or non-finite inputs is the
//! caller's job. No rounding happens here, only when a value is rendered for display.

use crate::core::codec::{CURRENCY_SYMBOL, format_decimal, format_hundredths};

/// Centimeters in one meter.
const CENTIMETERS_PER_METER: f64 = 100.0;

/// Converts a length in centimeters to meters.
#[must_use]
pub fn convert_centimeters_to_meters(cm: f64) -> f64 {
    cm / CENTIMETERS_PER_METER
}

/// Area in square meters of a `width_cm` x `height_cm` rectangle.
#[must_use]
pub fn calculate_area(width_cm: f64, height_cm: f64) -> f64 {
    convert_centimeters_to_meters(width_cm) * convert_centimeters_to_meters(height_cm)
}

/// Optional per-unit fittings added on top of the area price.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Eyelets {
    /// Number of fittings
    pub count: u32,
    /// Price of a single fitting
    pub unit_price: f64,
}

impl Eyelets {
    /// Builds the fitting line. A zero count carries no price.
    #[must_use]
    pub fn new(count: u32, unit_price: f64) -> Self {
        if count == 0 {
            return Self::default();
        }
        Self { count, unit_price }
    }

    /// Combined price of all fittings.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.count) * self.unit_price
    }
}

/// Total price: `area * price_per_square_meter` plus the eyelet subtotal.
///
/// Pass [`Eyelets::default()`] when no fittings were ordered.
#[must_use]
pub fn calculate_total_value(area: f64, price_per_square_meter: f64, eyelets: Eyelets) -> f64 {
    area * price_per_square_meter + eyelets.subtotal()
}

/// Renders an already computed amount as money, e.g. `R$ 2.670,00`.
#[must_use]
pub fn format_as_currency_display(value: f64) -> String {
    let amount = format_decimal(value);
    match amount.strip_prefix('-') {
        Some(magnitude) => format!("-{CURRENCY_SYMBOL} {magnitude}"),
        None => format!("{CURRENCY_SYMBOL} {amount}"),
    }
}

/// Renders an area with two decimals and its unit, e.g. `17.60 m²`.
#[must_use]
pub fn format_area_display(area: f64) -> String {
    format!("{} m²", format_hundredths(area))
}
