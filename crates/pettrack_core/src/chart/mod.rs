//! Chart read models for weight trends.
//!
//! # See also
//! - `service::pet_service::PetDetail`

pub mod series;
