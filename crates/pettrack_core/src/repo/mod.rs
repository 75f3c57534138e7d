//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define explicit CRUD + sorted-query contracts for pets and entries.
//! - Keep SQL details out of service and FFI layers.
//!
//! # Invariants
//! - Writes validate models before touching SQL.
//! - Reads reject invalid persisted rows instead of masking them.
//! - Deleting a pet deletes its entries in the same transaction.

pub mod error;
pub mod pet_repo;
mod schema;
pub mod weight_entry_repo;
