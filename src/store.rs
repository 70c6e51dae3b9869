//! In-memory entity store.
//!
//! Owns the canonical record collections. All other components read snapshots
//! through `list`/`get` and never mutate in place; consumers that need to
//! react to changes subscribe to the broadcast channel instead of holding
//! their own copies.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::{AppError, AppResult};
use crate::models::*;

/// A record kind the store can manage.
pub trait Entity: Clone + Send + 'static {
    type Draft;

    /// Lowercase kind name used in errors and change events.
    const KIND: &'static str;

    /// Builds a record from a staged draft and an assigned id.
    ///
    /// Fails only when the draft is missing a structurally required field;
    /// business validation happens in the staging buffer before commit.
    fn from_draft(id: u64, draft: Self::Draft) -> AppResult<Self>;

    fn id(&self) -> u64;
}

/// What changed in a store, for subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: &'static str,
    pub id: u64,
    pub change: Change,
}

/// Generic in-memory collection with identity assignment and change events.
///
/// Ids come from a monotonic counter seeded at `max(existing) + 1`, so an id
/// freed by a delete is never handed out again.
pub struct EntityStore<T: Entity> {
    records: Vec<T>,
    next_id: u64,
    events: broadcast::Sender<ChangeEvent>,
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            records: Vec::new(),
            next_id: 1,
            events,
        }
    }

    /// Builds a store over pre-existing records, preserving their order.
    pub fn with_records(records: Vec<T>) -> Self {
        let next_id = records.iter().map(Entity::id).max().unwrap_or(0) + 1;
        let (events, _) = broadcast::channel(64);
        Self {
            records,
            next_id,
            events,
        }
    }

    /// Assigns the next id, appends and returns the new record.
    pub fn create(&mut self, draft: T::Draft) -> AppResult<T> {
        let record = T::from_draft(self.next_id, draft)?;
        self.next_id += 1;
        self.records.push(record.clone());
        self.notify(record.id(), Change::Created);
        Ok(record)
    }

    /// Replaces the record with a matching id in full, preserving the id.
    pub fn update(&mut self, id: u64, draft: T::Draft) -> AppResult<T> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;
        let record = T::from_draft(id, draft)?;
        self.records[pos] = record.clone();
        self.notify(id, Change::Updated);
        Ok(record)
    }

    /// Removes the record with a matching id. Other ids are unaffected.
    pub fn remove(&mut self, id: u64) -> AppResult<()> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;
        self.records.remove(pos);
        self.notify(id, Change::Deleted);
        Ok(())
    }

    /// Snapshot of all records in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.records.clone()
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn notify(&self, id: u64, change: Change) {
        // No receivers is fine; the store does not depend on its consumers.
        let _ = self.events.send(ChangeEvent {
            kind: T::KIND,
            id,
            change,
        });
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Appointment {
    type Draft = AppointmentDraft;
    const KIND: &'static str = "appointment";

    fn from_draft(id: u64, draft: AppointmentDraft) -> AppResult<Self> {
        let specialty = draft
            .specialty
            .ok_or_else(|| AppError::Validation("specialty is required".to_string()))?;
        let date = draft
            .date
            .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
        Ok(Self {
            id,
            doctor_name: draft.doctor_name,
            specialty,
            date,
            time: draft.time,
            location: draft.location,
            phone_number: draft.phone_number,
            notes: draft.notes,
        })
    }

    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Prescription {
    type Draft = PrescriptionDraft;
    const KIND: &'static str = "prescription";

    fn from_draft(id: u64, draft: PrescriptionDraft) -> AppResult<Self> {
        let frequency = draft
            .frequency
            .ok_or_else(|| AppError::Validation("frequency is required".to_string()))?;
        Ok(Self {
            id,
            name: draft.name,
            dosage: draft.dosage,
            frequency,
            start_date: draft.start_date,
            end_date: draft.end_date,
            refill_date: draft.refill_date,
            prescribed_by: draft.prescribed_by,
            notes: draft.notes,
        })
    }

    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Reminder {
    type Draft = ReminderDraft;
    const KIND: &'static str = "reminder";

    fn from_draft(id: u64, draft: ReminderDraft) -> AppResult<Self> {
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            time: draft.time,
            recurring: draft.recurring,
            days: draft.days,
            date: draft.date,
        })
    }

    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Document {
    type Draft = DocumentDraft;
    const KIND: &'static str = "document";

    fn from_draft(id: u64, draft: DocumentDraft) -> AppResult<Self> {
        let date = draft
            .date
            .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
        let category = draft
            .category
            .ok_or_else(|| AppError::Validation("category is required".to_string()))?;
        Ok(Self {
            id,
            title: draft.title,
            date,
            category,
            file_size: draft.file_size,
            file_type: draft.file_type,
        })
    }

    fn id(&self) -> u64 {
        self.id
    }
}
