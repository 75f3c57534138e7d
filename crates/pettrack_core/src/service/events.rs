//! Change notifications published after successful mutations.
//!
//! # Invariants
//! - Events are published only after the repository write succeeded.
//! - Listeners run synchronously, in subscription order.

use crate::model::pet::PetId;
use crate::model::weight_entry::WeightEntryId;

/// What changed. Carries ids only; listeners re-read what they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    PetCreated {
        pet_id: PetId,
    },
    PetUpdated {
        pet_id: PetId,
    },
    PetDeleted {
        pet_id: PetId,
        removed_entries: usize,
    },
    EntryAdded {
        pet_id: PetId,
        entry_id: WeightEntryId,
    },
    EntryUpdated {
        pet_id: PetId,
        entry_id: WeightEntryId,
    },
    EntryDeleted {
        pet_id: PetId,
        entry_id: WeightEntryId,
    },
}

impl ChangeEvent {
    /// Pet whose detail view is affected.
    pub fn pet_id(&self) -> PetId {
        match *self {
            Self::PetCreated { pet_id }
            | Self::PetUpdated { pet_id }
            | Self::PetDeleted { pet_id, .. }
            | Self::EntryAdded { pet_id, .. }
            | Self::EntryUpdated { pet_id, .. }
            | Self::EntryDeleted { pet_id, .. } => pet_id,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::PetCreated { .. } => "pet_created",
            Self::PetUpdated { .. } => "pet_updated",
            Self::PetDeleted { .. } => "pet_deleted",
            Self::EntryAdded { .. } => "entry_added",
            Self::EntryUpdated { .. } => "entry_updated",
            Self::EntryDeleted { .. } => "entry_deleted",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&ChangeEvent)>;

/// Ordered list of change listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ChangeNotifier {
    pub fn subscribe(&mut self, listener: impl Fn(&ChangeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    pub fn publish(&self, event: &ChangeEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
