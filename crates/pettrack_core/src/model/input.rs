//! Raw form input parsing.
//!
//! # Responsibility
//! - Turn text typed into add/edit forms into validated drafts.
//! - Reject bad input before any model or storage mutation happens.
//!
//! # Invariants
//! - Weight text must be a plain decimal; exponents, `inf` and `NaN` are rejected.
//! - A rejected form never yields a draft.

use crate::model::pet::NewPet;
use crate::model::species::SPECIES_PLACEHOLDER;
use crate::model::unit::WeightUnit;
use crate::model::validation::{require_text, validate_weight, ValidationError};
use crate::model::weight_entry::WeightEntryDraft;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("valid decimal regex"));

/// Parses weight text from a form field.
///
/// # Errors
/// - `EmptyWeight` for blank input.
/// - `InvalidWeight` for anything that is not a plain decimal.
/// - `NonPositiveWeight` for `0` or negative values.
pub fn parse_weight_input(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyWeight);
    }
    if !DECIMAL_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidWeight(trimmed.to_string()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidWeight(trimmed.to_string()))?;
    validate_weight(value)
}

/// Field state of the add-pet form.
#[derive(Debug, Clone, PartialEq)]
pub struct PetForm {
    pub name: String,
    pub birthday: NaiveDate,
    pub species: String,
    pub initial_weight: String,
    pub unit: WeightUnit,
}

impl PetForm {
    /// Validates all fields and produces a creation draft.
    pub fn submit(&self) -> Result<NewPet, ValidationError> {
        let name = require_text(&self.name, ValidationError::EmptyName)?;
        let species = require_text(&self.species, ValidationError::EmptySpecies)?;
        if species == SPECIES_PLACEHOLDER {
            return Err(ValidationError::EmptySpecies);
        }
        let initial_weight = parse_weight_input(&self.initial_weight)?;
        Ok(NewPet {
            name,
            birthday: self.birthday,
            species,
            initial_weight,
            unit: self.unit,
        })
    }
}

/// Field state of the add/edit weight-entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntryForm {
    pub date: NaiveDate,
    pub weight: String,
    pub unit: WeightUnit,
    pub notes: String,
}

impl WeightEntryForm {
    /// Pre-fills an edit form the way the entry is displayed (one decimal).
    pub fn from_draft(draft: &WeightEntryDraft) -> Self {
        Self {
            date: draft.date,
            weight: format!("{:.1}", draft.weight),
            unit: draft.unit,
            notes: draft.notes.clone(),
        }
    }

    pub fn submit(&self) -> Result<WeightEntryDraft, ValidationError> {
        let weight = parse_weight_input(&self.weight)?;
        Ok(WeightEntryDraft::new(self.date, weight, self.unit).with_notes(self.notes.trim()))
    }
}
