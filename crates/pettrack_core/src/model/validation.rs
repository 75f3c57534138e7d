//! Validation errors shared by pet and weight-entry models.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Dialog text shown when the add-pet form is rejected.
pub const PET_FORM_ERROR_MESSAGE: &str = "Please fill in all fields correctly.";
/// Dialog text shown when a weight-entry form is rejected.
pub const WEIGHT_FORM_ERROR_MESSAGE: &str = "Please enter a valid weight.";

/// Input validation failure. The only user-facing error category.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Pet name is empty after trimming.
    EmptyName,
    /// Species is empty or still the picker placeholder.
    EmptySpecies,
    /// Weight field was left blank.
    EmptyWeight,
    /// Weight text is not a plain decimal number, or the value is not finite.
    InvalidWeight(String),
    /// Weight parsed but is zero or negative.
    NonPositiveWeight(f64),
    /// Stable IDs must never be nil.
    NilId,
    /// Entry back-reference does not point at the pet that holds it.
    ForeignEntry { entry_id: Uuid, expected_pet: Uuid, actual_pet: Uuid },
}

impl ValidationError {
    /// Static description for the blocking error dialog.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyWeight | Self::InvalidWeight(_) | Self::NonPositiveWeight(_) => {
                WEIGHT_FORM_ERROR_MESSAGE
            }
            _ => PET_FORM_ERROR_MESSAGE,
        }
    }

    /// Whether this failure concerns the weight field.
    pub fn is_weight_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyWeight | Self::InvalidWeight(_) | Self::NonPositiveWeight(_)
        )
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pet name must not be empty"),
            Self::EmptySpecies => write!(f, "species must not be empty"),
            Self::EmptyWeight => write!(f, "weight must not be empty"),
            Self::InvalidWeight(raw) => write!(f, "weight `{raw}` is not a valid number"),
            Self::NonPositiveWeight(value) => {
                write!(f, "weight must be greater than 0, got {value}")
            }
            Self::NilId => write!(f, "id must not be nil"),
            Self::ForeignEntry {
                entry_id,
                expected_pet,
                actual_pet,
            } => write!(
                f,
                "weight entry {entry_id} belongs to pet {actual_pet}, not {expected_pet}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks that a numeric weight is finite and strictly positive.
pub fn validate_weight(weight: f64) -> Result<f64, ValidationError> {
    if !weight.is_finite() {
        return Err(ValidationError::InvalidWeight(weight.to_string()));
    }
    if weight <= 0.0 {
        return Err(ValidationError::NonPositiveWeight(weight));
    }
    Ok(weight)
}

/// Trims `value` and rejects it with `error` when nothing is left.
pub(crate) fn require_text(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}
