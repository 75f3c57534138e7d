//! Weight entry domain model.
//!
//! # Responsibility
//! - Define one dated weight measurement owned by a pet.
//! - Validate weight and trim notes on create and in-place edit.
//!
//! # Invariants
//! - `weight` is finite and `> 0`.
//! - `pet_id` is the owning pet; entries never change owner.
//! - `notes` are stored trimmed; empty means "no notes".

use crate::model::pet::PetId;
use crate::model::unit::{convert, Weight, WeightUnit};
use crate::model::validation::{validate_weight, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a weight entry.
pub type WeightEntryId = Uuid;

/// Field values for creating or editing a weight entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntryDraft {
    pub date: NaiveDate,
    pub weight: f64,
    pub unit: WeightUnit,
    #[serde(default)]
    pub notes: String,
}

impl WeightEntryDraft {
    /// Draft without notes.
    pub fn new(date: NaiveDate, weight: f64, unit: WeightUnit) -> Self {
        Self {
            date,
            weight,
            unit,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_weight(self.weight).map(|_| ())
    }
}

/// One dated weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: WeightEntryId,
    /// Back-reference to the owning pet.
    pub pet_id: PetId,
    pub date: NaiveDate,
    pub weight: f64,
    pub unit: WeightUnit,
    #[serde(default)]
    pub notes: String,
}

impl WeightEntry {
    /// Creates a validated entry with a generated ID.
    pub fn new(pet_id: PetId, draft: WeightEntryDraft) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), pet_id, draft)
    }

    /// Creates a validated entry with a caller-provided ID.
    ///
    /// Used when loading persisted rows.
    pub fn with_id(
        id: WeightEntryId,
        pet_id: PetId,
        draft: WeightEntryDraft,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        let entry = Self {
            id,
            pet_id,
            date: draft.date,
            weight: draft.weight,
            unit: draft.unit,
            notes: draft.notes.trim().to_string(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Replaces date, weight, unit and notes in place.
    ///
    /// On error the entry is left untouched.
    pub fn apply(&mut self, draft: WeightEntryDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.date = draft.date;
        self.weight = draft.weight;
        self.unit = draft.unit;
        self.notes = draft.notes.trim().to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() || self.pet_id.is_nil() {
            return Err(ValidationError::NilId);
        }
        validate_weight(self.weight)?;
        Ok(())
    }

    /// Current field values as an editable draft.
    pub fn to_draft(&self) -> WeightEntryDraft {
        WeightEntryDraft {
            date: self.date,
            weight: self.weight,
            unit: self.unit,
            notes: self.notes.clone(),
        }
    }

    pub fn as_weight(&self) -> Weight {
        Weight::new(self.weight, self.unit)
    }

    pub fn weight_in_kg(&self) -> f64 {
        self.as_weight().in_kilograms()
    }

    pub fn weight_in(&self, unit: WeightUnit) -> f64 {
        convert(self.weight, self.unit, unit)
    }

    /// Weight to one decimal place followed by the unit symbol, e.g. `45.5 lbs`.
    pub fn display_weight(&self) -> String {
        self.as_weight().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{WeightEntry, WeightEntryDraft};
    use crate::model::unit::WeightUnit;
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn new_trims_notes_and_formats_display() {
        let entry = WeightEntry::new(
            Uuid::new_v4(),
            WeightEntryDraft::new(day(1), 45.55, WeightUnit::Pounds).with_notes("  after walk "),
        )
        .unwrap();

        assert_eq!(entry.notes, "after walk");
        assert_eq!(entry.display_weight(), "45.5 lbs");
        assert!((entry.weight_in_kg() - 45.55 * 0.45359237).abs() < 1e-12);
    }

    #[test]
    fn apply_rejects_invalid_weight_without_mutation() {
        let mut entry = WeightEntry::new(
            Uuid::new_v4(),
            WeightEntryDraft::new(day(1), 10.0, WeightUnit::Kilograms),
        )
        .unwrap();
        let before = entry.clone();

        let err = entry
            .apply(WeightEntryDraft::new(day(2), -1.0, WeightUnit::Pounds))
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveWeight(-1.0));
        assert_eq!(entry, before);

        entry
            .apply(WeightEntryDraft::new(day(2), 22.0, WeightUnit::Pounds).with_notes("vet"))
            .unwrap();
        assert_eq!(entry.date, day(2));
        assert_eq!(entry.unit, WeightUnit::Pounds);
        assert_eq!(entry.notes, "vet");
        assert_eq!(entry.id, before.id);
    }

    #[test]
    fn with_id_rejects_nil_ids() {
        let err = WeightEntry::with_id(
            Uuid::nil(),
            Uuid::new_v4(),
            WeightEntryDraft::new(day(1), 1.0, WeightUnit::Kilograms),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NilId);
    }
}
