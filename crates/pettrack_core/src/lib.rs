//! Core domain logic for the pet weight tracker.
//! This crate is the single source of truth for pet and weight-entry invariants.

pub mod chart;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use chart::series::{ChartPoint, ChartSeries, ChartShape};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::age::age_string;
pub use model::comparison::{compare, ChangeDirection, WeightComparison};
pub use model::input::{parse_weight_input, PetForm, WeightEntryForm};
pub use model::pet::{NewPet, Pet, PetId, INITIAL_ENTRY_NOTES};
pub use model::species::{species_icon, COMMON_SPECIES, SPECIES_PLACEHOLDER};
pub use model::unit::{convert, Weight, WeightUnit};
pub use model::validation::{ValidationError, PET_FORM_ERROR_MESSAGE, WEIGHT_FORM_ERROR_MESSAGE};
pub use model::weight_entry::{WeightEntry, WeightEntryDraft, WeightEntryId};
pub use repo::error::{RepoError, RepoResult};
pub use repo::pet_repo::{PetListQuery, PetRepository, SqlitePetRepository};
pub use repo::weight_entry_repo::{EntryOrder, SqliteWeightEntryRepository, WeightEntryRepository};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::events::{ChangeEvent, SubscriptionId};
pub use service::pet_service::{PetDetail, PetService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
