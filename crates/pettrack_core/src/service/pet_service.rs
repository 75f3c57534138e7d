//! Pet and weight-entry use-case service.
//!
//! # Responsibility
//! - Provide the create/edit/delete use-cases the UI invokes.
//! - Build display-ready read models (`PetDetail`).
//! - Notify subscribers after every committed mutation.
//!
//! # Invariants
//! - Validation runs before any repository write; a rejected input leaves
//!   storage untouched and publishes nothing.
//! - Service layer stays storage-agnostic.
//! - User-entered text (names, notes) is never logged.

use crate::chart::series::ChartSeries;
use crate::model::comparison::{compare, WeightComparison};
use crate::model::input::{PetForm, WeightEntryForm};
use crate::model::pet::{NewPet, Pet, PetId};
use crate::model::species::species_icon;
use crate::model::unit::{Weight, WeightUnit};
use crate::model::validation::ValidationError;
use crate::model::weight_entry::{WeightEntry, WeightEntryDraft, WeightEntryId};
use crate::repo::error::RepoError;
use crate::repo::pet_repo::{PetListQuery, PetRepository};
use crate::repo::weight_entry_repo::{EntryOrder, WeightEntryRepository};
use crate::service::clock::{Clock, SystemClock};
use crate::service::events::{ChangeEvent, ChangeNotifier, SubscriptionId};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for pet use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected; show `ValidationError::user_message` to the user.
    Validation(ValidationError),
    PetNotFound(PetId),
    EntryNotFound(WeightEntryId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Dialog text for validation failures; `None` for non-user errors.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PetNotFound(id) => write!(f, "pet not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "weight entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::PetNotFound(id) => Self::PetNotFound(id),
            RepoError::EntryNotFound(id) => Self::EntryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Everything the pet detail screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PetDetail {
    pub pet: Pet,
    pub age: String,
    pub species_icon: &'static str,
    pub latest: Option<WeightEntry>,
    /// Newest first.
    pub history: Vec<WeightEntry>,
    /// In the pet's preferred unit.
    pub chart: ChartSeries,
}

/// Use-case facade over pet and weight-entry repositories.
pub struct PetService<P: PetRepository, E: WeightEntryRepository> {
    pets: P,
    entries: E,
    clock: Box<dyn Clock>,
    notifier: ChangeNotifier,
}

impl<P: PetRepository, E: WeightEntryRepository> PetService<P, E> {
    /// Creates a service that dates seed entries with the device clock.
    pub fn new(pets: P, entries: E) -> Self {
        Self::with_clock(pets, entries, SystemClock)
    }

    pub fn with_clock(pets: P, entries: E, clock: impl Clock + 'static) -> Self {
        Self {
            pets,
            entries,
            clock: Box::new(clock),
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Registers a listener called after every committed mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&ChangeEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Creates a pet with its seed entry dated today.
    pub fn create_pet(&self, draft: NewPet) -> ServiceResult<Pet> {
        let pet = Pet::new(draft, self.clock.today())?;
        self.pets.create_pet(&pet)?;
        self.publish(ChangeEvent::PetCreated { pet_id: pet.id });
        Ok(pet)
    }

    /// Validates raw add-pet form text, then creates the pet.
    pub fn create_pet_from_form(&self, form: &PetForm) -> ServiceResult<Pet> {
        self.create_pet(form.submit()?)
    }

    /// Adds a measurement. Dates need not be unique or in order.
    pub fn add_weight_entry(
        &self,
        pet_id: PetId,
        draft: WeightEntryDraft,
    ) -> ServiceResult<WeightEntry> {
        let entry = WeightEntry::new(pet_id, draft)?;
        self.entries.create_entry(&entry)?;
        self.publish(ChangeEvent::EntryAdded {
            pet_id,
            entry_id: entry.id,
        });
        Ok(entry)
    }

    pub fn add_weight_entry_from_form(
        &self,
        pet_id: PetId,
        form: &WeightEntryForm,
    ) -> ServiceResult<WeightEntry> {
        self.add_weight_entry(pet_id, form.submit()?)
    }

    /// Replaces date, weight, unit and notes of an existing entry.
    pub fn edit_weight_entry(
        &self,
        entry_id: WeightEntryId,
        draft: WeightEntryDraft,
    ) -> ServiceResult<WeightEntry> {
        draft.validate()?;
        let mut entry = self.require_entry(entry_id)?;
        entry.apply(draft)?;
        self.entries.update_entry(&entry)?;
        self.publish(ChangeEvent::EntryUpdated {
            pet_id: entry.pet_id,
            entry_id,
        });
        Ok(entry)
    }

    pub fn edit_weight_entry_from_form(
        &self,
        entry_id: WeightEntryId,
        form: &WeightEntryForm,
    ) -> ServiceResult<WeightEntry> {
        self.edit_weight_entry(entry_id, form.submit()?)
    }

    pub fn delete_weight_entry(&self, entry_id: WeightEntryId) -> ServiceResult<()> {
        let entry = self.require_entry(entry_id)?;
        self.entries.delete_entry(entry_id)?;
        self.publish(ChangeEvent::EntryDeleted {
            pet_id: entry.pet_id,
            entry_id,
        });
        Ok(())
    }

    /// Deletes a pet and every entry it owns; returns the entry count removed.
    pub fn delete_pet(&self, pet_id: PetId) -> ServiceResult<usize> {
        let removed_entries = self.pets.delete_pet(pet_id)?;
        self.publish(ChangeEvent::PetDeleted {
            pet_id,
            removed_entries,
        });
        Ok(removed_entries)
    }

    pub fn set_preferred_unit(&self, pet_id: PetId, unit: WeightUnit) -> ServiceResult<Pet> {
        let mut pet = self.require_pet(pet_id)?;
        pet.set_preferred_unit(unit);
        self.pets.update_pet(&pet)?;
        self.publish(ChangeEvent::PetUpdated { pet_id });
        Ok(pet)
    }

    pub fn get_pet(&self, pet_id: PetId) -> ServiceResult<Option<Pet>> {
        Ok(self.pets.get_pet(pet_id)?)
    }

    pub fn get_weight_entry(&self, entry_id: WeightEntryId) -> ServiceResult<Option<WeightEntry>> {
        Ok(self.entries.get_entry(entry_id)?)
    }

    /// Edit form pre-filled from a stored entry; weight shown to one decimal.
    pub fn weight_entry_edit_form(
        &self,
        entry_id: WeightEntryId,
    ) -> ServiceResult<WeightEntryForm> {
        let entry = self.require_entry(entry_id)?;
        Ok(WeightEntryForm::from_draft(&entry.to_draft()))
    }

    /// All pets sorted by name.
    pub fn list_pets(&self) -> ServiceResult<Vec<Pet>> {
        self.list_pets_with(&PetListQuery::default())
    }

    pub fn list_pets_with(&self, query: &PetListQuery) -> ServiceResult<Vec<Pet>> {
        Ok(self.pets.list_pets(query)?)
    }

    /// Builds the detail read model for one pet.
    pub fn pet_detail(&self, pet_id: PetId) -> ServiceResult<PetDetail> {
        let pet = self.require_pet(pet_id)?;
        let history = self.entries.list_entries(pet_id, EntryOrder::Descending)?;
        let chart = ChartSeries::from_entries(&pet.entries, pet.preferred_unit);
        Ok(PetDetail {
            age: pet.age_string(self.clock.today()),
            species_icon: species_icon(&pet.species),
            latest: pet.latest_entry().cloned(),
            history,
            chart,
            pet,
        })
    }

    /// Compares a candidate measurement with the pet's latest entry.
    ///
    /// Returns `None` when the pet has no entries or `date` is not strictly
    /// after the latest entry's date. Dates carry no time of day, so a
    /// candidate on the same day as the latest entry (including the seed
    /// entry on the day the pet was created) is not compared.
    pub fn compare_with_latest(
        &self,
        pet_id: PetId,
        date: NaiveDate,
        candidate: Weight,
    ) -> ServiceResult<Option<WeightComparison>> {
        let pet = self.require_pet(pet_id)?;
        Ok(pet
            .latest_entry()
            .filter(|latest| date > latest.date)
            .map(|latest| compare(candidate, latest.as_weight())))
    }

    fn require_pet(&self, pet_id: PetId) -> ServiceResult<Pet> {
        self.pets
            .get_pet(pet_id)?
            .ok_or(ServiceError::PetNotFound(pet_id))
    }

    fn require_entry(&self, entry_id: WeightEntryId) -> ServiceResult<WeightEntry> {
        self.entries
            .get_entry(entry_id)?
            .ok_or(ServiceError::EntryNotFound(entry_id))
    }

    fn publish(&self, event: ChangeEvent) {
        info!(
            "event={} module=service status=ok pet_id={}",
            event.label(),
            event.pet_id()
        );
        self.notifier.publish(&event);
    }
}
