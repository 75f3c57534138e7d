//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Publish change events so UI layers know when to re-read.
//!
//! # See also
//! - `repo` for persistence contracts.

pub mod clock;
pub mod events;
pub mod pet_service;
