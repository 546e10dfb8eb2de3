//! Form controller - Transient input state for one calculator session.
//!
//! The controller owns the five text fields, the id of the record being edited, the last
//! result and the in-memory copy of the history. Raw keystrokes go through the locale
//! codec, a submit parses the fields and runs the calculation, and the history store
//! persists the outcome. Presentation (labels, layout, spinners) is left to the caller.
//!
//! Every mutating operation takes `&mut self`, so a second submit cannot start while one
//! is still waiting out the calculation delay.

use crate::{
    core::{
        calculation::Eyelets,
        codec::{
            format_cents_as_currency, format_decimal, format_integer, format_plain_number,
            parse_to_count, parse_to_number, sanitize_digits,
        },
        history::HistoryStore,
        record::{CalculationInput, CalculationRecord, now_millis},
        slot::KeyValueSlot,
    },
    errors::Result,
};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// The input fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Width in centimeters
    Width,
    /// Height in centimeters
    Height,
    /// Price per square meter
    PricePerSquareMeter,
    /// Number of eyelets
    EyeletCount,
    /// Price of one eyelet
    EyeletPrice,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Self; 5] = [
        Self::Width,
        Self::Height,
        Self::PricePerSquareMeter,
        Self::EyeletCount,
        Self::EyeletPrice,
    ];

    /// Money fields are typed with the cents convention.
    #[must_use]
    pub const fn is_currency(self) -> bool {
        matches!(self, Self::PricePerSquareMeter | Self::EyeletPrice)
    }
}

/// Current text of every field, exactly as displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Width text
    pub width: String,
    /// Height text
    pub height: String,
    /// Price per square meter text
    pub price_per_square_meter: String,
    /// Eyelet count text
    pub eyelet_count: String,
    /// Eyelet price text
    pub eyelet_price: String,
}

impl FormFields {
    /// Text of one field
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Width => &self.width,
            Field::Height => &self.height,
            Field::PricePerSquareMeter => &self.price_per_square_meter,
            Field::EyeletCount => &self.eyelet_count,
            Field::EyeletPrice => &self.eyelet_price,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Width => &mut self.width,
            Field::Height => &mut self.height,
            Field::PricePerSquareMeter => &mut self.price_per_square_meter,
            Field::EyeletCount => &mut self.eyelet_count,
            Field::EyeletPrice => &mut self.eyelet_price,
        }
    }

    /// Parses every field. Unusable text counts as zero.
    #[must_use]
    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            width: parse_to_number(&self.width),
            height: parse_to_number(&self.height),
            price_per_square_meter: parse_to_number(&self.price_per_square_meter),
            eyelets: Eyelets::new(
                parse_to_count(&self.eyelet_count),
                parse_to_number(&self.eyelet_price),
            ),
        }
    }

    /// Field text that, once submitted, reproduces `record`'s inputs.
    #[must_use]
    pub fn from_record(record: &CalculationRecord) -> Self {
        let eyelets = record.eyelets();
        Self {
            width: format_plain_number(record.width()),
            height: format_plain_number(record.height()),
            price_per_square_meter: format_decimal(record.price_per_square_meter()),
            eyelet_count: if eyelets.count > 0 {
                eyelets.count.to_string()
            } else {
                String::new()
            },
            eyelet_price: if eyelets.unit_price > 0.0 {
                format_decimal(eyelets.unit_price)
            } else {
                String::new()
            },
        }
    }
}

/// One calculator session on top of a [`HistoryStore`].
#[derive(Debug)]
pub struct FormController<S> {
    store: HistoryStore<S>,
    calculation_delay: Duration,
    fields: FormFields,
    editing_id: Option<String>,
    result: Option<CalculationRecord>,
    history: Vec<CalculationRecord>,
}

impl<S: KeyValueSlot> FormController<S> {
    /// Starts a session with empty fields and the persisted history.
    pub async fn open(store: HistoryStore<S>, calculation_delay: Duration) -> Self {
        let history = store.load().await;
        debug!(count = history.len(), "Opened calculator session");
        Self {
            store,
            calculation_delay,
            fields: FormFields::default(),
            editing_id: None,
            result: None,
            history,
        }
    }

    /// Current field text
    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Id of the record being edited, if any
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    /// Last successful calculation, cleared by an invalid submit
    pub const fn result(&self) -> Option<&CalculationRecord> {
        self.result.as_ref()
    }

    /// History as of the last load or write, most recent first
    pub fn history(&self) -> &[CalculationRecord] {
        &self.history
    }

    /// The store this session persists to
    pub const fn store(&self) -> &HistoryStore<S> {
        &self.store
    }

    /// Applies raw typed text to a field and returns the normalized text.
    ///
    /// Only digits survive. Money fields are shown with the cents convention, so typing
    /// `250` into the eyelet price shows `2,50`.
    pub fn type_into(&mut self, field: Field, raw: &str) -> &str {
        let text = if raw.is_empty() {
            String::new()
        } else if field.is_currency() {
            format_cents_as_currency(raw)
        } else {
            sanitize_digits(raw)
        };

        let slot = self.fields.get_mut(field);
        *slot = text;
        slot
    }

    /// Re-renders a field when the user leaves it and returns the resulting text.
    ///
    /// Plain fields get thousands grouping. Money fields are read as a decimal number and
    /// shown with two decimals; text without any digit is left alone.
    pub fn blur(&mut self, field: Field) -> &str {
        let slot = self.fields.get_mut(field);
        if slot.is_empty() {
            return slot;
        }

        if field.is_currency() {
            let numeric: String = slot
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == ',')
                .collect();
            if numeric.chars().any(|c| c.is_ascii_digit()) {
                *slot = format_decimal(parse_to_number(&numeric));
            }
        } else {
            *slot = format_integer(slot.as_str());
        }
        slot
    }

    /// Parses the fields and, if width, height and price are positive, computes and
    /// stores a result.
    ///
    /// A new record goes to the front of the history. While editing, the edited record is
    /// replaced in place and keeps its id. Invalid input clears the current result and
    /// returns `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error if the history cannot be written.
    #[instrument(skip(self), fields(editing = self.editing_id.is_some()))]
    pub async fn submit(&mut self) -> Result<Option<CalculationRecord>> {
        let input = self.fields.to_input();
        if !input.is_submittable() {
            debug!("Submission ignored: width, height and price must be positive");
            self.result = None;
            return Ok(None);
        }

        if !self.calculation_delay.is_zero() {
            tokio::time::sleep(self.calculation_delay).await;
        }

        let (record, history) = match self.editing_id.as_deref() {
            Some(id) => {
                let record = CalculationRecord::compute(id, now_millis(), input);
                let history = self.store.update_by_id(record.clone()).await?;
                (record, history)
            }
            None => {
                let record = CalculationRecord::new(input);
                let history = self
                    .store
                    .insert(record.clone(), self.history.clone())
                    .await?;
                (record, history)
            }
        };

        info!(
            id = record.id(),
            area = record.area(),
            total = record.total_value(),
            "Calculation stored"
        );
        self.history = history;
        self.result = Some(record.clone());
        self.editing_id = None;
        Ok(Some(record))
    }

    /// Loads a history entry into the fields for editing. Returns `false` if no entry has
    /// this id.
    pub fn edit(&mut self, id: &str) -> bool {
        let Some(record) = self.history.iter().find(|entry| entry.id() == id) else {
            debug!(id, "Cannot edit unknown calculation");
            return false;
        };

        self.fields = FormFields::from_record(record);
        self.editing_id = Some(record.id().to_string());
        true
    }

    /// Clears every field and leaves edit mode.
    pub fn reset(&mut self) {
        self.fields = FormFields::default();
        self.editing_id = None;
    }

    /// Deletes a history entry. Clears the shown result if it was that entry, and resets
    /// the form if that entry was being edited.
    ///
    /// # Errors
    /// Returns an error if the history cannot be written.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.history = self.store.delete_by_id(id).await?;

        if self.result.as_ref().is_some_and(|record| record.id() == id) {
            self.result = None;
        }
        if self.editing_id.as_deref() == Some(id) {
            self.reset();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::slot::MemorySlot;
    use crate::test_utils::*;

    async fn open_form() -> FormController<MemorySlot> {
        FormController::open(memory_history(), Duration::ZERO).await
    }

    fn fill_banner(form: &mut FormController<MemorySlot>) {
        form.type_into(Field::Width, "550");
        form.type_into(Field::Height, "320");
        form.type_into(Field::PricePerSquareMeter, "15000");
        form.type_into(Field::EyeletCount, "12");
        form.type_into(Field::EyeletPrice, "250");
    }

    #[test]
    fn test_field_kinds() {
        let currency: Vec<_> = Field::ALL.into_iter().filter(|f| f.is_currency()).collect();
        assert_eq!(currency, [Field::PricePerSquareMeter, Field::EyeletPrice]);
    }

    #[tokio::test]
    async fn test_type_into_normalizes_input() {
        let mut form = open_form().await;

        assert_eq!(form.type_into(Field::Width, "5a5-0"), "550");
        assert_eq!(form.type_into(Field::PricePerSquareMeter, "1"), "0,01");
        assert_eq!(form.type_into(Field::PricePerSquareMeter, "15000"), "150,00");
        assert_eq!(form.type_into(Field::PricePerSquareMeter, "150,001"), "1.500,01");
        assert_eq!(form.type_into(Field::EyeletPrice, "abc"), "");
        assert_eq!(form.type_into(Field::Width, ""), "");
        assert_eq!(form.fields().get(Field::PricePerSquareMeter), "1.500,01");
    }

    #[tokio::test]
    async fn test_blur_formats_fields() {
        let mut form = open_form().await;

        form.type_into(Field::Width, "1234567");
        assert_eq!(form.blur(Field::Width), "1.234.567");
        assert_eq!(form.blur(Field::Width), "1.234.567");

        form.type_into(Field::EyeletPrice, "250");
        assert_eq!(form.blur(Field::EyeletPrice), "2,50");

        assert_eq!(form.blur(Field::Height), "");
    }

    #[tokio::test]
    async fn test_submit_creates_record() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);

        let record = form.submit().await?.unwrap();

        assert_eq!(record.area(), 17.6);
        assert_eq!(record.total_value(), 2670.0);
        assert_eq!(record.eyelet_count(), 12);
        assert_eq!(record.eyelet_price(), 2.5);
        assert_eq!(form.result(), Some(&record));
        assert_eq!(form.history(), [record.clone()]);
        assert_eq!(form.store().load().await, [record]);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_without_eyelets() -> Result<()> {
        let mut form = open_form().await;
        form.type_into(Field::Width, "100");
        form.type_into(Field::Height, "200");
        form.type_into(Field::PricePerSquareMeter, "1000");
        form.type_into(Field::EyeletPrice, "500");

        let record = form.submit().await?.unwrap();

        assert_eq!(record.area(), 2.0);
        assert_eq!(record.eyelet_count(), 0);
        assert_eq!(record.eyelet_price(), 0.0);
        assert_eq!(record.total_value(), 20.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_submit_clears_result() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);
        form.submit().await?;
        assert!(form.result().is_some());

        form.type_into(Field::Height, "");
        assert_eq!(form.submit().await?, None);
        assert!(form.result().is_none());
        assert_eq!(form.history().len(), 1);

        form.type_into(Field::Height, "320");
        form.type_into(Field::PricePerSquareMeter, "0");
        assert_eq!(form.submit().await?, None);
        assert_eq!(form.store().load().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_new_submissions_are_prepended() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);
        let first = form.submit().await?.unwrap();

        form.type_into(Field::Width, "100");
        let second = form.submit().await?.unwrap();

        assert_ne!(first.id(), second.id());
        let ids: Vec<_> = form.history().iter().map(CalculationRecord::id).collect();
        assert_eq!(ids, [second.id(), first.id()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_and_resubmit_updates_in_place() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);
        let original = form.submit().await?.unwrap();

        assert!(form.edit(original.id()));
        assert_eq!(form.editing_id(), Some(original.id()));
        assert_eq!(form.fields().width, "550");
        assert_eq!(form.fields().height, "320");
        assert_eq!(form.fields().price_per_square_meter, "150,00");
        assert_eq!(form.fields().eyelet_count, "12");
        assert_eq!(form.fields().eyelet_price, "2,50");

        form.type_into(Field::PricePerSquareMeter, "20000");
        let updated = form.submit().await?.unwrap();

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.total_value(), 3550.0);
        assert_eq!(form.editing_id(), None);

        let stored = form.store().load().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id(), original.id());
        assert_eq!(stored[0].total_value(), 3550.0);
        assert_eq!(form.history(), stored);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_blank_eyelets() -> Result<()> {
        let store = memory_history();
        store.save(&[square_meter_record("plain", 10.0)]).await?;
        let mut form = FormController::open(store, Duration::ZERO).await;

        assert!(form.edit("plain"));
        assert_eq!(form.fields().width, "100");
        assert_eq!(form.fields().price_per_square_meter, "10,00");
        assert_eq!(form.fields().eyelet_count, "");
        assert_eq!(form.fields().eyelet_price, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let mut form = open_form().await;
        assert!(!form.edit("nope"));
        assert_eq!(form.editing_id(), None);
    }

    #[tokio::test]
    async fn test_reset_leaves_edit_mode() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);
        let record = form.submit().await?.unwrap();

        form.edit(record.id());
        form.reset();

        assert_eq!(form.editing_id(), None);
        assert_eq!(form.fields(), &FormFields::default());

        fill_banner(&mut form);
        form.submit().await?;
        assert_eq!(form.history().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_clears_result_and_edit_state() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);
        let record = form.submit().await?.unwrap();

        form.edit(record.id());
        form.delete(record.id()).await?;

        assert!(form.history().is_empty());
        assert!(form.result().is_none());
        assert_eq!(form.editing_id(), None);
        assert_eq!(form.fields(), &FormFields::default());
        assert!(form.store().load().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_other_entry_keeps_result() -> Result<()> {
        let mut form = open_form().await;
        fill_banner(&mut form);
        let first = form.submit().await?.unwrap();
        form.type_into(Field::Width, "100");
        let second = form.submit().await?.unwrap();

        form.delete(first.id()).await?;

        assert_eq!(form.result(), Some(&second));
        assert_eq!(form.history(), [second]);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_loads_persisted_history() -> Result<()> {
        let store = memory_history();
        store.save(&[banner_record("a"), banner_record("b")]).await?;

        let form = FormController::open(store, Duration::ZERO).await;

        assert_eq!(form.history().len(), 2);
        assert!(form.result().is_none());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_waits_for_calculation_delay() -> Result<()> {
        let mut form = FormController::open(memory_history(), Duration::from_millis(500)).await;
        fill_banner(&mut form);

        let started = tokio::time::Instant::now();
        form.submit().await?;

        assert!(started.elapsed() >= Duration::from_millis(500));
        Ok(())
    }
}
