//! Pet domain model.
//!
//! # Responsibility
//! - Define the pet record and the weight-entry collection it owns.
//! - Provide derived views over entries (sorted, latest, history, age).
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - `name` and `species` are non-empty after trimming.
//! - Every entry in `entries` has `pet_id == id`.
//! - A freshly created pet holds exactly one seed entry.

use crate::model::age::age_string;
use crate::model::unit::WeightUnit;
use crate::model::validation::{require_text, validate_weight, ValidationError};
use crate::model::weight_entry::{WeightEntry, WeightEntryDraft, WeightEntryId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a pet.
pub type PetId = Uuid;

/// Notes attached to the entry created together with a pet.
pub const INITIAL_ENTRY_NOTES: &str = "Initial weight";

/// Validated-on-use input for creating a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub birthday: NaiveDate,
    pub species: String,
    pub initial_weight: f64,
    pub unit: WeightUnit,
}

/// A tracked animal and its weight history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub birthday: NaiveDate,
    pub species: String,
    /// Display unit; stored entry values are never rewritten when it changes.
    pub preferred_unit: WeightUnit,
    #[serde(default)]
    pub entries: Vec<WeightEntry>,
}

impl Pet {
    /// Creates a pet plus its seed entry dated `today`.
    ///
    /// # Errors
    /// - `EmptyName` / `EmptySpecies` for blank text.
    /// - `InvalidWeight` / `NonPositiveWeight` for the initial weight.
    pub fn new(draft: NewPet, today: NaiveDate) -> Result<Self, ValidationError> {
        validate_weight(draft.initial_weight)?;
        let mut pet = Self::with_id(
            Uuid::new_v4(),
            &draft.name,
            draft.birthday,
            &draft.species,
            draft.unit,
        )?;
        let seed = WeightEntryDraft::new(today, draft.initial_weight, draft.unit)
            .with_notes(INITIAL_ENTRY_NOTES);
        pet.add_entry(seed)?;
        Ok(pet)
    }

    /// Builds a pet without entries from already-identified data.
    ///
    /// Used by repository read paths; text is trimmed and validated.
    pub fn with_id(
        id: PetId,
        name: &str,
        birthday: NaiveDate,
        species: &str,
        preferred_unit: WeightUnit,
    ) -> Result<Self, ValidationError> {
        if id.is_nil() {
            return Err(ValidationError::NilId);
        }
        Ok(Self {
            id,
            name: require_text(name, ValidationError::EmptyName)?,
            birthday,
            species: require_text(species, ValidationError::EmptySpecies)?,
            preferred_unit,
            entries: Vec::new(),
        })
    }

    /// Checks record fields and the ownership of every held entry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text(&self.name, ValidationError::EmptyName)?;
        require_text(&self.species, ValidationError::EmptySpecies)?;
        for entry in &self.entries {
            if entry.pet_id != self.id {
                return Err(ValidationError::ForeignEntry {
                    entry_id: entry.id,
                    expected_pet: self.id,
                    actual_pet: entry.pet_id,
                });
            }
            entry.validate()?;
        }
        Ok(())
    }

    pub fn set_preferred_unit(&mut self, unit: WeightUnit) {
        self.preferred_unit = unit;
    }

    /// Adds a new entry. Dates may repeat or arrive out of order.
    pub fn add_entry(&mut self, draft: WeightEntryDraft) -> Result<&WeightEntry, ValidationError> {
        let entry = WeightEntry::new(self.id, draft)?;
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Attaches an existing entry, enforcing the back-reference.
    pub fn attach_entry(&mut self, entry: WeightEntry) -> Result<(), ValidationError> {
        if entry.pet_id != self.id {
            return Err(ValidationError::ForeignEntry {
                entry_id: entry.id,
                expected_pet: self.id,
                actual_pet: entry.pet_id,
            });
        }
        entry.validate()?;
        self.entries.push(entry);
        Ok(())
    }

    /// Removes and returns the entry with `id`, if present.
    pub fn remove_entry(&mut self, id: WeightEntryId) -> Option<WeightEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Entries ascending by date; equal dates keep collection order.
    pub fn sorted_entries(&self) -> Vec<&WeightEntry> {
        let mut sorted: Vec<&WeightEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|entry| entry.date);
        sorted
    }

    /// Entries newest first, the exact reverse of `sorted_entries`.
    pub fn history(&self) -> Vec<&WeightEntry> {
        let mut history = self.sorted_entries();
        history.reverse();
        history
    }

    /// Most recent entry; on equal dates the last one in collection order.
    pub fn latest_entry(&self) -> Option<&WeightEntry> {
        self.entries.iter().max_by_key(|entry| entry.date)
    }

    pub fn age_string(&self, today: NaiveDate) -> String {
        age_string(self.birthday, today)
    }
}
