//! Pet / weight-entry domain model and its derived computations.
//!
//! # Responsibility
//! - Define canonical records used by core business logic.
//! - Keep derived values (sorting, age, conversion, comparison) pure.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - A pet owns its entries; deleting a pet removes all of them.
//! - Stored weights keep their recorded unit; conversion happens at read time.

pub mod age;
pub mod comparison;
pub mod input;
pub mod pet;
pub mod species;
pub mod unit;
pub mod validation;
pub mod weight_entry;
